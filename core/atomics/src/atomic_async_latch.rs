use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex};
use tokio::sync::Notify;

/// A one-shot latch that starts closed and can be opened exactly once.
///
/// Waiters can block the current thread ([`wait_blocking`](Self::wait_blocking)) or await the
/// latch from async code ([`wait`](Self::wait)). Once open, the latch stays open and every wait
/// returns immediately.
#[derive(Default)]
pub struct AtomicAsyncLatch {
    is_open: AtomicBool,
    notify: Notify,
    lock: Mutex<()>,
    opened: Condvar,
}

impl AtomicAsyncLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the latch and wakes all waiters. Returns `false` if it was already open.
    pub fn open(&self) -> bool {
        if self.is_open.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.notify.notify_waiters();

        // Taking the lock orders the wakeup after any blocking waiter that already checked the
        // flag and is about to park.
        let _guard = self.lock.lock();
        self.opened.notify_all();
        true
    }

    pub fn is_open(&self) -> bool {
        self.is_open.load(Ordering::Acquire)
    }

    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_open() {
                return;
            }
            notified.await;
        }
    }

    pub fn wait_blocking(&self) {
        if self.is_open() {
            return;
        }

        let mut guard = self.lock.lock();
        while !self.is_open() {
            self.opened.wait(&mut guard);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread, time::Duration};

    use super::*;

    #[test]
    fn test_open_is_one_shot() {
        let latch = AtomicAsyncLatch::new();
        assert!(!latch.is_open());
        assert!(latch.open());
        assert!(latch.is_open());
        assert!(!latch.open());
        assert!(latch.is_open());
    }

    #[test]
    fn test_wait_blocking_wakes_all_waiters() {
        let latch = Arc::new(AtomicAsyncLatch::new());

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let latch = latch.clone();
                thread::spawn(move || latch.wait_blocking())
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        latch.open();

        for waiter in waiters {
            waiter.join().expect("waiter panicked");
        }
    }

    #[test]
    fn test_wait_blocking_on_open_latch_returns() {
        let latch = AtomicAsyncLatch::new();
        latch.open();
        latch.wait_blocking();
        latch.wait_blocking();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_async_wait() {
        let latch = Arc::new(AtomicAsyncLatch::new());

        let opener = {
            let latch = latch.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                latch.open();
            })
        };

        tokio::time::timeout(Duration::from_secs(5), latch.wait())
            .await
            .expect("latch was never opened");
        opener.join().expect("opener panicked");
    }
}
