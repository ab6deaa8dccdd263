/// A type-erased unit of deferred work.
///
/// Tasks are produced by [`WorkerPool::submit`](crate::WorkerPool::submit), which wraps the
/// caller's closure so that its outcome lands in a [`Handle`](crate::Handle). A `Task` itself
/// never fails: by the time it reaches the queue, errors and panics are already routed.
pub(crate) struct Task(Box<dyn FnOnce() + Send + 'static>);

impl Task {
    pub(crate) fn new(body: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(body))
    }

    pub(crate) fn execute(self) {
        (self.0)()
    }
}
