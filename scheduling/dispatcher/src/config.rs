use std::num::NonZeroUsize;

use nlpkit_scheduling_worker_pool::PoolConfig;

use crate::RemainderPolicy;

/// Execution settings shared by every batch operation.
///
/// The host's available parallelism is queried once, when the config is created, and then travels
/// explicitly with the config. A requested thread count of `0` resolves to that value.
#[derive(Clone, Debug)]
pub struct ExecutionConfig {
    /// Number of worker threads for pools created from this config.
    pub worker_count: usize,
    /// Thread count substituted when a caller requests `0` threads.
    pub available_parallelism: NonZeroUsize,
    /// How chunk boundaries absorb the remainder of an uneven split.
    pub remainder_policy: RemainderPolicy,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        let available_parallelism =
            std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN);
        Self {
            worker_count: available_parallelism.get(),
            available_parallelism,
            remainder_policy: RemainderPolicy::default(),
        }
    }
}

impl ExecutionConfig {
    /// Creates a new config, resolving the host's available parallelism.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the worker count.
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Overrides the resolved available parallelism.
    pub fn with_available_parallelism(mut self, available_parallelism: NonZeroUsize) -> Self {
        self.available_parallelism = available_parallelism;
        self
    }

    /// Sets the remainder policy used when partitioning.
    pub fn with_remainder_policy(mut self, remainder_policy: RemainderPolicy) -> Self {
        self.remainder_policy = remainder_policy;
        self
    }

    /// Resolves a requested thread count, mapping `0` to the available parallelism.
    pub fn resolve_threads(&self, requested: usize) -> NonZeroUsize {
        NonZeroUsize::new(requested).unwrap_or(self.available_parallelism)
    }

    /// Returns the pool configuration matching this execution config.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::default().with_worker_count(self.worker_count)
    }
}
