use std::path::PathBuf;

/// Error type for text toolkit operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A batch operation failed in one or more chunks.
    #[error(transparent)]
    Dispatch(#[from] nlpkit_scheduling_dispatcher::Error),

    /// The toolkit's worker pool could not be created.
    #[error(transparent)]
    Pool(#[from] nlpkit_scheduling_worker_pool::Error),

    /// A token id outside the vocabulary was passed to decode.
    #[error("invalid token id {id} (vocabulary size {vocab_size})")]
    InvalidTokenId { id: u32, vocab_size: usize },

    /// A word list file could not be read.
    #[error("failed to read word list {}: {source}", .path.display())]
    WordList { path: PathBuf, source: std::io::Error },

    /// The export destination could not be written.
    #[error("failed to export to {}: {source}", .path.display())]
    Export { path: PathBuf, source: std::io::Error },

    #[error("failed to serialize export record: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
