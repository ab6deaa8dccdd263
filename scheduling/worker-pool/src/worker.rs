use std::{
    io,
    sync::Arc,
    thread::{self, JoinHandle},
};

use crate::{PoolMonitor, work_queue::WorkQueue};

/// A single worker thread draining the shared [`WorkQueue`].
pub(crate) struct Worker {
    id: usize,
    queue: Arc<WorkQueue>,
    monitor: PoolMonitor,
}

impl Worker {
    pub(crate) fn new(id: usize, queue: Arc<WorkQueue>, monitor: PoolMonitor) -> Self {
        Self { id, queue, monitor }
    }

    pub(crate) fn start(self, name_prefix: &str) -> io::Result<JoinHandle<()>> {
        // Counted before the thread exists so a monitor never observes a spawned-but-uncounted
        // worker.
        self.monitor.worker_started();
        let monitor = self.monitor.clone();

        thread::Builder::new()
            .name(format!("{name_prefix}-{}", self.id))
            .spawn(move || self.run())
            .inspect_err(|_| monitor.worker_stopped())
    }

    fn run(self) {
        log::debug!("worker {} started", self.id);

        // Exits only when the queue is closed and empty, so queued work always drains.
        while let Some(task) = self.queue.pop_blocking() {
            task.execute();
        }

        log::debug!("worker {} stopped", self.id);
        self.monitor.worker_stopped();
    }
}
