use std::sync::{
    Arc,
    atomic::{AtomicU64, AtomicUsize, Ordering},
};

use crossbeam_utils::CachePadded;

/// Live counters for a [`WorkerPool`](crate::WorkerPool).
///
/// A monitor is a cheap clone of the pool's counters and stays readable after the pool is gone,
/// which is how callers verify that no worker thread outlived it.
#[derive(Clone, Default)]
pub struct PoolMonitor(Arc<PoolStats>);

#[derive(Default)]
struct PoolStats {
    running_workers: CachePadded<AtomicUsize>,
    completed_tasks: CachePadded<AtomicU64>,
    failed_tasks: CachePadded<AtomicU64>,
}

impl PoolMonitor {
    /// Number of worker threads that have started and not yet exited.
    pub fn running_workers(&self) -> usize {
        self.0.running_workers.load(Ordering::Acquire)
    }

    /// Number of tasks that ran to completion, including failed ones.
    pub fn completed_tasks(&self) -> u64 {
        self.0.completed_tasks.load(Ordering::Acquire)
    }

    /// Number of tasks whose body returned an error or panicked.
    pub fn failed_tasks(&self) -> u64 {
        self.0.failed_tasks.load(Ordering::Acquire)
    }

    pub(crate) fn worker_started(&self) {
        self.0.running_workers.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn worker_stopped(&self) {
        self.0.running_workers.fetch_sub(1, Ordering::AcqRel);
    }

    pub(crate) fn task_finished(&self, failed: bool) {
        if failed {
            self.0.failed_tasks.fetch_add(1, Ordering::Relaxed);
        }
        self.0.completed_tasks.fetch_add(1, Ordering::AcqRel);
    }
}

impl std::fmt::Debug for PoolMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolMonitor")
            .field("running_workers", &self.running_workers())
            .field("completed_tasks", &self.completed_tasks())
            .field("failed_tasks", &self.failed_tasks())
            .finish()
    }
}
