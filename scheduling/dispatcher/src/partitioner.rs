use std::{num::NonZeroUsize, ops::Range};

use crate::{Chunk, ExecutionConfig, PartitionError};

/// Where the remainder of an uneven split goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemainderPolicy {
    /// The first `remainder` chunks get one extra item each; sizes differ by at most one.
    #[default]
    Spread,
    /// The last chunk absorbs the whole remainder.
    Last,
}

/// Splits an ordered sequence into contiguous, order-preserving chunks.
#[derive(Clone, Debug)]
pub struct ChunkPartitioner {
    policy: RemainderPolicy,
    available_parallelism: NonZeroUsize,
}

impl ChunkPartitioner {
    pub fn new(policy: RemainderPolicy, available_parallelism: NonZeroUsize) -> Self {
        Self { policy, available_parallelism }
    }

    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self::new(config.remainder_policy, config.available_parallelism)
    }

    pub fn policy(&self) -> RemainderPolicy {
        self.policy
    }

    /// Number of chunks a request produces: `requested` clamped to `[1, max(1, item_count)]`,
    /// with `0` replaced by the available parallelism first.
    pub fn effective_threads(&self, item_count: usize, requested: usize) -> usize {
        let requested = NonZeroUsize::new(requested).unwrap_or(self.available_parallelism);
        requested.get().min(item_count.max(1))
    }

    /// Partitions `[0, item_count)`. An empty sequence yields no chunks.
    pub fn partition(&self, item_count: usize, requested: usize) -> Vec<Chunk> {
        self.split(0, item_count, requested)
    }

    /// Partitions `range`, failing when the range is inverted.
    pub fn partition_range(
        &self,
        range: Range<usize>,
        requested: usize,
    ) -> Result<Vec<Chunk>, PartitionError> {
        if range.end < range.start {
            return Err(PartitionError::InvertedRange { start: range.start, end: range.end });
        }
        Ok(self.split(range.start, range.end - range.start, requested))
    }

    fn split(&self, offset: usize, item_count: usize, requested: usize) -> Vec<Chunk> {
        if item_count == 0 {
            return Vec::new();
        }

        let threads = self.effective_threads(item_count, requested);
        let base = item_count / threads;
        let remainder = item_count % threads;

        let mut start = offset;
        (0..threads)
            .map(|index| {
                let extra = match self.policy {
                    RemainderPolicy::Spread => usize::from(index < remainder),
                    RemainderPolicy::Last if index == threads - 1 => remainder,
                    RemainderPolicy::Last => 0,
                };
                let end = start + base + extra;
                let chunk = Chunk { index, start, end };
                start = end;
                chunk
            })
            .collect()
    }
}
