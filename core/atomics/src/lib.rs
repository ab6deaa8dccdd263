mod atomic_async_latch;

pub use atomic_async_latch::AtomicAsyncLatch;
