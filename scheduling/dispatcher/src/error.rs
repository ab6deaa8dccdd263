use nlpkit_scheduling_worker_pool::TaskError;

use crate::Chunk;

/// Invalid partition request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    #[error("range end {end} precedes start {start}")]
    InvertedRange { start: usize, end: usize },
}

/// A chunk whose task failed, together with the failure.
#[derive(Clone, Debug)]
pub struct ChunkFailure {
    pub chunk: Chunk,
    pub error: TaskError,
}

/// Error type for dispatch operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The pool rejected a submission or could not be created.
    #[error(transparent)]
    Pool(#[from] nlpkit_scheduling_worker_pool::Error),

    /// A range passed to [`dispatch_range`](crate::ParallelDispatcher::dispatch_range) was
    /// inverted.
    #[error(transparent)]
    Partition(#[from] PartitionError),

    /// At least one chunk failed. Results of the chunks that succeeded are discarded.
    #[error(
        "{} of {total} chunks failed, first in chunk {}: {}",
        .failures.len(), .failures[0].chunk, .failures[0].error
    )]
    ChunksFailed { failures: Vec<ChunkFailure>, total: usize },
}

impl Error {
    /// Returns the failed chunks, if this is a chunk failure.
    pub fn chunk_failures(&self) -> &[ChunkFailure] {
        match self {
            Error::ChunksFailed { failures, .. } => failures,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
