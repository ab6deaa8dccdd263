//! Chunked parallel map-reduce over a [`WorkerPool`](nlpkit_scheduling_worker_pool::WorkerPool).
//!
//! A batch operation hands the [`ParallelDispatcher`] an ordered sequence, a per-item function
//! and a requested degree of parallelism. The [`ChunkPartitioner`] splits the sequence into
//! contiguous chunks, one pool task runs per chunk, and a [`MergePolicy`] combines the per-chunk
//! results into the same value a serial run would produce:
//!
//! - [`Concat`] / [`Flatten`]: ordered concatenation.
//! - [`Accumulate`]: commutative accumulation per key.
//! - [`KeepLast`]: one value per unique key, last occurrence in input order wins.
//!
//! # Usage
//!
//! ```ignore
//! use nlpkit_scheduling_dispatcher::{Concat, ExecutionConfig, ParallelDispatcher};
//! use nlpkit_scheduling_worker_pool::WorkerPool;
//!
//! let config = ExecutionConfig::default();
//! let pool = WorkerPool::new(config.pool_config())?;
//! let lengths = ParallelDispatcher::new(&pool, &config)
//!     .dispatch(words, |w: String| Ok::<_, BoxError>(w.len()), 0, Concat)?;
//! ```

mod chunk;
mod config;
mod dispatcher;
mod error;
mod merge;
mod partitioner;

pub use chunk::Chunk;
pub use config::ExecutionConfig;
pub use dispatcher::{ParallelDispatcher, parallel_map};
pub use error::{ChunkFailure, Error, PartitionError, Result};
pub use merge::{Accumulate, Concat, Flatten, KeepLast, MergePolicy};
pub use partitioner::{ChunkPartitioner, RemainderPolicy};
