use std::sync::Arc;

use arc_swap::ArcSwapOption;
use nlpkit_core_atomics::AtomicAsyncLatch;

use crate::TaskError;

/// Write-once, read-many container for the outcome of a submitted task.
///
/// The outcome is published through [`ArcSwapOption`]s and signalled through an
/// [`AtomicAsyncLatch`], so readers never contend on a lock. Any number of threads can wait on the
/// same handle by reference; every read observes the same outcome.
pub struct Handle<T> {
    shared: Arc<Shared<T>>,
}

/// The writing half of a [`Handle`], owned by the task.
///
/// Dropping a promise without completing it resolves the handle with [`TaskError::Abandoned`], so
/// a reader can never wait forever on work that will not run.
pub(crate) struct Promise<T> {
    shared: Option<Arc<Shared<T>>>,
}

struct Shared<T> {
    value: ArcSwapOption<T>,
    error: ArcSwapOption<TaskError>,
    done: AtomicAsyncLatch,
}

pub(crate) fn channel<T>() -> (Promise<T>, Handle<T>) {
    let shared = Arc::new(Shared {
        value: ArcSwapOption::empty(),
        error: ArcSwapOption::empty(),
        done: AtomicAsyncLatch::new(),
    });
    (Promise { shared: Some(shared.clone()) }, Handle { shared })
}

impl<T> Promise<T> {
    pub(crate) fn complete(mut self, outcome: Result<T, TaskError>) {
        if let Some(shared) = self.shared.take() {
            shared.publish(outcome);
        }
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            shared.publish(Err(TaskError::Abandoned));
        }
    }
}

impl<T> Shared<T> {
    fn publish(&self, outcome: Result<T, TaskError>) {
        match outcome {
            Ok(value) => self.value.store(Some(Arc::new(value))),
            Err(error) => self.error.store(Some(Arc::new(error))),
        }
        self.done.open();
    }

    fn outcome(&self) -> Result<Arc<T>, TaskError> {
        match self.value.load_full() {
            Some(value) => Ok(value),
            None => Err(self.error.load_full().map_or(TaskError::Abandoned, |e| (*e).clone())),
        }
    }
}

impl<T> Handle<T> {
    /// Returns `true` once the task has finished, successfully or not.
    pub fn is_done(&self) -> bool {
        self.shared.done.is_open()
    }

    /// Blocks the current thread until the task finishes and returns its outcome.
    pub fn wait_blocking(&self) -> Result<Arc<T>, TaskError> {
        self.shared.done.wait_blocking();
        self.shared.outcome()
    }

    /// Asynchronously waits until the task finishes and returns its outcome.
    ///
    /// There is no built-in timeout. Racing this future against a timer gives a deadline; a miss
    /// means the result is ignored, not that the task stopped.
    pub async fn wait(&self) -> Result<Arc<T>, TaskError> {
        self.shared.done.wait().await;
        self.shared.outcome()
    }

    /// Waits for the task and takes its value out of the handle.
    ///
    /// The value is moved out without copying unless an earlier [`wait`](Self::wait) or
    /// [`wait_blocking`](Self::wait_blocking) result is still alive, in which case it is cloned.
    pub fn into_result(self) -> Result<T, TaskError>
    where
        T: Clone,
    {
        self.shared.done.wait_blocking();
        match self.shared.value.swap(None) {
            Some(value) => Ok(Arc::unwrap_or_clone(value)),
            None => self.shared.outcome().map(Arc::unwrap_or_clone),
        }
    }
}

impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle").field("done", &self.is_done()).finish()
    }
}
