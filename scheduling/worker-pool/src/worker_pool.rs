use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread::{self, JoinHandle, ThreadId},
};

use nlpkit_core_atomics::AtomicAsyncLatch;
use parking_lot::Mutex;
use tap::Tap;

use crate::{
    BoxError, Error, Handle, PoolConfig, PoolMonitor, Result, TaskError, handle, task::Task,
    work_queue::WorkQueue, worker::Worker,
};

/// A fixed set of worker threads executing submitted closures in FIFO order.
///
/// The pool is the only long-lived component of the scheduling layer and is owned by whoever
/// created it. Dropping the pool performs [`shutdown`](Self::shutdown), so worker threads never
/// outlive their owner's scope.
///
/// Lifecycle: created with an explicit worker count, accepts submissions, stops accepting on
/// shutdown, drains every task queued before the shutdown, joins all workers.
pub struct WorkerPool {
    worker_count: usize,
    queue: Arc<WorkQueue>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    worker_threads: Vec<ThreadId>,
    stopped: AtomicAsyncLatch,
    monitor: PoolMonitor,
}

impl WorkerPool {
    /// Spawns `config.worker_count` workers.
    pub fn new(config: PoolConfig) -> Result<Self> {
        if config.worker_count == 0 {
            return Err(Error::InvalidWorkerCount);
        }

        let mut pool = Self {
            worker_count: config.worker_count,
            queue: Arc::new(WorkQueue::new()),
            handles: Mutex::new(Vec::with_capacity(config.worker_count)),
            worker_threads: Vec::with_capacity(config.worker_count),
            stopped: AtomicAsyncLatch::new(),
            monitor: PoolMonitor::default(),
        };

        for id in 0..config.worker_count {
            // On failure `pool` is dropped here, which shuts down the workers spawned so far.
            let handle = Worker::new(id, pool.queue.clone(), pool.monitor.clone())
                .start(&config.thread_name_prefix)?;
            pool.worker_threads.push(handle.thread().id());
            pool.handles.get_mut().push(handle);
        }

        Ok(pool.tap(|pool| log::debug!("worker pool started with {} workers", pool.worker_count)))
    }

    /// Shorthand for a pool with default config and `worker_count` workers.
    pub fn with_workers(worker_count: usize) -> Result<Self> {
        Self::new(PoolConfig::default().with_worker_count(worker_count))
    }

    /// Enqueues `task` and returns a handle to its outcome. Never blocks.
    ///
    /// The task's error, or a panic raised inside it, is captured in the returned handle as a
    /// [`TaskError`]; the worker running it carries on with the next task. Fails with
    /// [`Error::PoolClosed`] once shutdown has begun.
    pub fn submit<T, E, F>(&self, task: F) -> Result<Handle<T>>
    where
        T: Send + Sync + 'static,
        E: Into<BoxError>,
        F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
    {
        let (promise, handle) = handle::channel();
        let monitor = self.monitor.clone();

        self.queue.push(Task::new(move || {
            let outcome = match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(err)) => Err(TaskError::failed(err)),
                Err(payload) => Err(TaskError::panicked(payload)),
            };

            if let Err(err) = &outcome {
                log::warn!("task failed on {:?}: {err}", thread::current().name());
            }
            monitor.task_finished(outcome.is_err());
            promise.complete(outcome);
        }))?;

        Ok(handle)
    }

    /// Stops accepting tasks, waits for every queued and running task, and joins the workers.
    ///
    /// Idempotent. Called automatically on drop. Concurrent calls all block until the workers are
    /// joined. When invoked from inside one of this pool's own tasks, the calling worker is not
    /// joined (it exits on its own once the queue drains) and the call does not wait.
    pub fn shutdown(&self) {
        let current = thread::current().id();

        // Only the call that closes the queue joins; every other call waits for it to finish.
        if !self.queue.close() {
            if !self.worker_threads.contains(&current) {
                self.stopped.wait_blocking();
            }
            return;
        }

        let handles = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                log::error!("worker thread panicked outside of a task");
            }
        }

        self.stopped.open();
        log::info!(
            "worker pool shut down ({} tasks completed, {} failed)",
            self.monitor.completed_tasks(),
            self.monitor.failed_tasks()
        );
    }

    /// Number of worker threads, fixed at construction.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Number of tasks waiting to be picked up by a worker.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` once shutdown has begun.
    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }

    /// Returns a monitor over this pool's counters that remains valid after the pool is dropped.
    pub fn monitor(&self) -> PoolMonitor {
        self.monitor.clone()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("worker_count", &self.worker_count)
            .field("queued", &self.queued())
            .field("closed", &self.is_closed())
            .finish()
    }
}
