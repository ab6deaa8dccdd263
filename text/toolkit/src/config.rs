use std::path::PathBuf;

use nlpkit_scheduling_dispatcher::ExecutionConfig;

/// Configuration for a [`TextToolkit`](crate::TextToolkit).
#[derive(Clone, Debug)]
pub struct ToolkitConfig {
    /// Pool size and partitioning settings.
    pub execution: ExecutionConfig,
    /// Thread count used when an operation is called without one. `0` means the available
    /// parallelism.
    pub default_threads: usize,
    /// Length of every generated embedding vector.
    pub embedding_dimensions: usize,
    pub embedding_seed: u64,
    /// JSON lines file that receives every operation result. Nothing is exported when unset.
    pub export_destination: Option<PathBuf>,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            execution: ExecutionConfig::default(),
            default_threads: 2,
            embedding_dimensions: 300,
            embedding_seed: 0,
            export_destination: None,
        }
    }
}

impl ToolkitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_execution(mut self, execution: ExecutionConfig) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_default_threads(mut self, default_threads: usize) -> Self {
        self.default_threads = default_threads;
        self
    }

    pub fn with_embedding_dimensions(mut self, embedding_dimensions: usize) -> Self {
        self.embedding_dimensions = embedding_dimensions;
        self
    }

    pub fn with_embedding_seed(mut self, embedding_seed: u64) -> Self {
        self.embedding_seed = embedding_seed;
        self
    }

    pub fn with_export_destination(mut self, export_destination: impl Into<PathBuf>) -> Self {
        self.export_destination = Some(export_destination.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToolkitConfig::default();
        assert_eq!(config.default_threads, 2);
        assert_eq!(config.embedding_dimensions, 300);
        assert!(config.export_destination.is_none());

        let config = config.with_embedding_dimensions(16).with_export_destination("out.jsonl");
        assert_eq!(config.embedding_dimensions, 16);
        assert_eq!(config.export_destination, Some(PathBuf::from("out.jsonl")));
    }
}
