use nlpkit_scheduling_worker_pool::{BoxError, Handle, WorkerPool};

use crate::CompletionRecorder;

/// Extension trait for worker pool test helpers.
pub trait PoolExt {
    /// Submits a task that records `id` in `recorder` and returns it.
    fn submit_recorded(&self, recorder: &CompletionRecorder, id: usize) -> Handle<usize>;

    /// Submits a task that fails with `message`.
    fn submit_failing(&self, message: &'static str) -> Handle<()>;

    /// Asserts that the pool has shut down and every worker thread has exited.
    fn assert_stopped(&self) -> &Self;
}

impl PoolExt for WorkerPool {
    fn submit_recorded(&self, recorder: &CompletionRecorder, id: usize) -> Handle<usize> {
        let recorder = recorder.clone();
        self.submit(move || {
            recorder.record(id);
            Ok::<_, BoxError>(id)
        })
        .expect("pool rejected task")
    }

    fn submit_failing(&self, message: &'static str) -> Handle<()> {
        self.submit(move || Err::<(), BoxError>(message.into())).expect("pool rejected task")
    }

    fn assert_stopped(&self) -> &Self {
        assert!(self.is_closed(), "pool is still accepting tasks");
        assert_eq!(self.queued(), 0, "pool stopped with queued tasks");
        assert_eq!(self.monitor().running_workers(), 0, "worker threads still running");
        self
    }
}
