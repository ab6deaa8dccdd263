//! A fixed-size pool of OS worker threads draining one shared FIFO queue.
//!
//! Work is submitted as closures; every submission returns a [`Handle`] that receives the task's
//! outcome exactly once. Errors and panics raised by a task are captured in its handle and never
//! take down the worker that ran it.
//!
//! # Usage
//!
//! ```ignore
//! use nlpkit_scheduling_worker_pool::{PoolConfig, WorkerPool};
//!
//! let pool = WorkerPool::new(PoolConfig::default().with_worker_count(4))?;
//! let handle = pool.submit(|| Ok::<_, std::io::Error>(21 * 2))?;
//! assert_eq!(*handle.wait_blocking()?, 42);
//!
//! // Also runs on drop.
//! pool.shutdown();
//! ```

mod config;
mod error;
mod handle;
mod monitor;
mod task;
mod work_queue;
mod worker;
mod worker_pool;

pub use config::PoolConfig;
pub use error::{BoxError, Error, Result, TaskError};
pub use handle::Handle;
pub use monitor::PoolMonitor;
pub use worker_pool::WorkerPool;
