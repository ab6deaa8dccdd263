use std::{any::Any, sync::Arc};

/// Boxed error type accepted from task bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for worker pool operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Submission attempted after shutdown began. The task was not queued.
    #[error("worker pool is closed")]
    PoolClosed,

    /// A pool needs at least one worker.
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure raised while executing a task body.
///
/// Stored in the task's [`Handle`](crate::Handle) and returned to every reader, so it is cheap to
/// clone.
#[derive(Clone, Debug, thiserror::Error)]
pub enum TaskError {
    /// The task returned an error.
    #[error("task failed: {0}")]
    Failed(#[source] Arc<dyn std::error::Error + Send + Sync + 'static>),

    /// The task panicked. Carries the panic message when it was a string.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The task was dropped without running.
    #[error("task was dropped before it ran")]
    Abandoned,
}

impl TaskError {
    pub(crate) fn failed(cause: impl Into<BoxError>) -> Self {
        TaskError::Failed(Arc::from(cause.into()))
    }

    pub(crate) fn panicked(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_owned(),
                Err(_) => "non-string panic payload".to_owned(),
            },
        };
        TaskError::Panicked(message)
    }

    /// Returns the original error when the task body returned one.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            TaskError::Failed(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }
}
