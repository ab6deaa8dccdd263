use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use crate::{Error, Result, task::Task};

/// Unbounded FIFO of pending tasks shared by all producers and all workers.
///
/// One lock guards both the tasks and the closed flag, so a push either lands in the queue before
/// [`close`](Self::close) or is rejected; nothing is dropped in between. Idle workers sleep on a
/// single condition variable.
pub(crate) struct WorkQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

#[derive(Default)]
struct QueueState {
    tasks: VecDeque<Task>,
    closed: bool,
}

impl WorkQueue {
    pub(crate) fn new() -> Self {
        Self { state: Mutex::new(QueueState::default()), available: Condvar::new() }
    }

    /// Appends a task and wakes one idle worker. Never blocks on capacity.
    pub(crate) fn push(&self, task: Task) -> Result<()> {
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(Error::PoolClosed);
            }
            state.tasks.push_back(task);
        }
        self.available.notify_one();
        Ok(())
    }

    /// Blocks until a task is available and removes it.
    ///
    /// Returns `None` only once the queue is closed and fully drained, which is the worker's
    /// signal to exit.
    pub(crate) fn pop_blocking(&self) -> Option<Task> {
        let mut state = self.state.lock();
        loop {
            if let Some(task) = state.tasks.pop_front() {
                return Some(task);
            }
            if state.closed {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    /// Rejects further pushes and wakes every idle worker. Returns `false` if already closed.
    pub(crate) fn close(&self) -> bool {
        let was_open = {
            let mut state = self.state.lock();
            !std::mem::replace(&mut state.closed, true)
        };
        self.available.notify_all();
        was_open
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }
}
