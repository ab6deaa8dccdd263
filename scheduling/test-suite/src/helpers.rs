use std::{
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use nlpkit_scheduling_dispatcher::{ExecutionConfig, MergePolicy};

/// An execution config with a fixed worker count and available parallelism, independent of the
/// host running the tests.
pub fn test_config(workers: usize) -> ExecutionConfig {
    let workers = NonZeroUsize::new(workers).expect("test config needs at least one worker");
    ExecutionConfig::new().with_worker_count(workers.get()).with_available_parallelism(workers)
}

/// Applies `f` serially in input order and merges with `merge`: the reference result for any
/// parallel run.
pub fn serial_map<I, O, E, M>(items: Vec<I>, f: impl Fn(I) -> Result<O, E>, merge: &M) -> M::Output
where
    E: std::fmt::Debug,
    M: MergePolicy<O>,
{
    merge.serial(items.into_iter().map(|item| f(item).expect("serial reference run failed")))
}

/// Polls `condition` every 10ms until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool, what: &str) {
    let start = Instant::now();
    while !condition() {
        if start.elapsed() > timeout {
            panic!("Timeout waiting for {what}");
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}
