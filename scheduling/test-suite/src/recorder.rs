use std::{collections::BTreeMap, sync::Arc};

use crossbeam_queue::SegQueue;

/// Lock-free log of task ids, recorded by tasks as a side effect of running.
#[derive(Clone, Default)]
pub struct CompletionRecorder(Arc<SegQueue<usize>>);

impl CompletionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, id: usize) {
        self.0.push(id);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drains the log into a map of id -> number of times it was recorded.
    pub fn drain_counts(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        while let Some(id) = self.0.pop() {
            *counts.entry(id).or_default() += 1;
        }
        counts
    }

    /// Asserts that every id in `0..expected` was recorded exactly once and nothing else was.
    pub fn assert_exactly_once(&self, expected: usize) -> &Self {
        let counts = self.drain_counts();
        assert_eq!(counts.len(), expected, "unexpected number of distinct completions");
        for (id, count) in counts {
            assert!(id < expected, "unknown task id {id} recorded");
            assert_eq!(count, 1, "task {id} recorded {count} times");
        }
        self
    }
}
