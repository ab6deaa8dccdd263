use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use nlpkit_scheduling_dispatcher::{
    Accumulate, Chunk, ChunkPartitioner, Concat, Error, KeepLast, ParallelDispatcher,
    RemainderPolicy, parallel_map,
};
use nlpkit_scheduling_test_suite::{
    CompletionRecorder, PoolExt, serial_map, test_config, wait_until,
};
use nlpkit_scheduling_worker_pool::{BoxError, TaskError, WorkerPool};
use proptest::prelude::*;

fn encode(word: String) -> Result<Vec<u8>, BoxError> {
    Ok(word.bytes().rev().collect())
}

fn sentences(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("sentence-{i}-{}", "x".repeat(i % 7))).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn parallel_concat_equals_serial(n in 0usize..=10_000, threads in 1usize..=64) {
        let config = test_config(8);
        let pool = WorkerPool::new(config.pool_config()).unwrap();
        let items = sentences(n);

        let expected = serial_map(items.clone(), encode, &Concat);
        let actual = ParallelDispatcher::new(&pool, &config)
            .dispatch(items, encode, threads, Concat)
            .unwrap();

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn partition_covers_range_exactly_once(n in 0usize..=10_000, threads in 1usize..=64) {
        let partitioner = ChunkPartitioner::from_config(&test_config(4));
        let chunks = partitioner.partition(n, threads);

        prop_assert!(chunks.len() <= threads.max(1));

        let mut next = 0;
        for (index, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.index(), index);
            prop_assert_eq!(chunk.start(), next);
            prop_assert!(!chunk.is_empty());
            next = chunk.end();
        }
        prop_assert_eq!(next, n);

        if let (Some(max), Some(min)) =
            (chunks.iter().map(Chunk::len).max(), chunks.iter().map(Chunk::len).min())
        {
            prop_assert!(max - min <= 1);
        }
    }

    #[test]
    fn counting_equals_serial(words in prop::collection::vec("[a-e]", 0..500), threads in 1usize..=16) {
        let config = test_config(4);
        let pool = WorkerPool::new(config.pool_config()).unwrap();
        let count = |w: String| Ok::<_, BoxError>((w, 1_u64));

        let expected = serial_map(words.clone(), count, &Accumulate);
        let actual = ParallelDispatcher::new(&pool, &config)
            .dispatch(words, count, threads, Accumulate)
            .unwrap();

        prop_assert_eq!(actual, expected);
    }
}

#[test]
fn test_chunking_example() {
    let partitioner = ChunkPartitioner::from_config(&test_config(4));
    let sizes: Vec<_> = partitioner.partition(11, 4).iter().map(Chunk::len).collect();
    assert_eq!(sizes, vec![3, 3, 3, 2]);
    assert_eq!(sizes.iter().sum::<usize>(), 11);

    let last = ChunkPartitioner::new(RemainderPolicy::Last, test_config(4).available_parallelism);
    let sizes: Vec<_> = last.partition(11, 4).iter().map(Chunk::len).collect();
    assert_eq!(sizes, vec![2, 2, 2, 5]);
}

#[test]
fn test_commutative_accumulation_example() {
    let words = vec!["a", "b", "a", "c", "b", "a"];
    let expected = HashMap::from([("a", 3_u32), ("b", 2), ("c", 1)]);

    for threads in [1, 2, 3, 6] {
        let counts = parallel_map(
            &test_config(4),
            words.clone(),
            |w| Ok::<_, BoxError>((w, 1_u32)),
            threads,
            Accumulate,
        )
        .unwrap();
        assert_eq!(counts, expected, "threads = {threads}");
    }
}

#[test]
fn test_no_lost_or_duplicate_work() {
    let pool = WorkerPool::with_workers(8).unwrap();
    let recorder = CompletionRecorder::new();

    let handles: Vec<_> = (0..1000).map(|id| pool.submit_recorded(&recorder, id)).collect();
    for (id, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.into_result().unwrap(), id);
    }

    assert_eq!(pool.monitor().completed_tasks(), 1000);
    recorder.assert_exactly_once(1000);
}

#[test]
fn test_closed_pool_rejects_but_drains() {
    let pool = WorkerPool::with_workers(2).unwrap();
    let recorder = CompletionRecorder::new();
    let gate = Arc::new(AtomicUsize::new(0));

    // Park both workers so the following tasks are still queued when shutdown starts.
    let blockers: Vec<_> = (0..2)
        .map(|_| {
            let gate = gate.clone();
            pool.submit(move || {
                while gate.load(Ordering::Acquire) == 0 {
                    thread::sleep(Duration::from_millis(1));
                }
                Ok::<_, BoxError>(())
            })
            .unwrap()
        })
        .collect();
    let queued: Vec<_> = (0..20).map(|id| pool.submit_recorded(&recorder, id)).collect();

    let shutdown = {
        let gate = gate.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            gate.store(1, Ordering::Release);
        })
    };
    pool.shutdown();
    shutdown.join().unwrap();

    for _ in 0..3 {
        assert!(matches!(
            pool.submit(|| Ok::<_, BoxError>(())),
            Err(nlpkit_scheduling_worker_pool::Error::PoolClosed)
        ));
    }

    assert!(blockers.iter().all(|h| h.is_done()));
    assert!(queued.iter().all(|h| h.is_done()));
    recorder.assert_exactly_once(20);
    pool.assert_stopped();
}

#[test]
fn test_error_isolation() {
    let config = test_config(4);
    let pool = WorkerPool::new(config.pool_config()).unwrap();
    let dispatcher = ParallelDispatcher::new(&pool, &config);
    let processed = Arc::new(AtomicUsize::new(0));

    let err = dispatcher
        .dispatch(
            (0..100_usize).collect(),
            {
                let processed = processed.clone();
                move |i| {
                    if i == 42 {
                        return Err(format!("cannot process item {i}"));
                    }
                    processed.fetch_add(1, Ordering::SeqCst);
                    Ok(i)
                }
            },
            4,
            Concat,
        )
        .unwrap_err();

    // Chunk [25, 50) stops at item 42; the other three chunks run to completion.
    let Error::ChunksFailed { failures, total } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(*total, 4);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].chunk.range(), 25..50);
    assert!(matches!(failures[0].error, TaskError::Failed(_)));
    assert_eq!(processed.load(Ordering::SeqCst), 75 + 17);
    assert!(err.to_string().contains("cannot process item 42"));

    // The pool keeps serving later calls.
    let doubled = dispatcher.dispatch(vec![1, 2, 3], |x: i32| Ok::<_, BoxError>(x * 2), 2, Concat);
    assert_eq!(doubled.unwrap(), vec![2, 4, 6]);

    // A failing task submitted directly only affects its own handle.
    let failing = pool.submit_failing("direct failure");
    let recorder = CompletionRecorder::new();
    let sibling = pool.submit_recorded(&recorder, 0);
    assert!(matches!(failing.wait_blocking(), Err(TaskError::Failed(_))));
    assert_eq!(sibling.into_result().unwrap(), 0);
}

#[test]
fn test_scope_exit_cleanup() {
    let monitor = {
        let pool = WorkerPool::with_workers(6).unwrap();
        let recorder = CompletionRecorder::new();
        for id in 0..30 {
            pool.submit_recorded(&recorder, id);
        }
        wait_until(Duration::from_secs(5), || pool.monitor().running_workers() == 6, "workers");
        pool.monitor()
    };

    assert_eq!(monitor.running_workers(), 0);
    assert_eq!(monitor.completed_tasks(), 30);
}

#[test]
fn test_keep_last_is_deterministic() {
    let config = test_config(4);
    let pool = WorkerPool::new(config.pool_config()).unwrap();
    let dispatcher = ParallelDispatcher::new(&pool, &config);
    let tokens: Vec<(String, usize)> = ["the", "cat", "the", "dog", "the"]
        .iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), i))
        .collect();

    for threads in 1..=5 {
        for _ in 0..10 {
            let merged = dispatcher
                .dispatch(tokens.clone(), Ok::<_, BoxError>, threads, KeepLast)
                .unwrap();
            assert_eq!(merged["the"], 4);
            assert_eq!(merged["cat"], 1);
            assert_eq!(merged["dog"], 3);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_caller_side_deadline() {
    let pool = WorkerPool::with_workers(1).unwrap();
    let release = Arc::new(AtomicUsize::new(0));

    let slow = {
        let release = release.clone();
        pool.submit(move || {
            while release.load(Ordering::Acquire) == 0 {
                thread::sleep(Duration::from_millis(1));
            }
            Ok::<_, BoxError>("finished")
        })
        .unwrap()
    };

    // Missing the deadline does not cancel the task.
    let missed = tokio::time::timeout(Duration::from_millis(30), slow.wait()).await;
    assert!(missed.is_err());
    assert!(!slow.is_done());

    release.store(1, Ordering::Release);
    let value = tokio::time::timeout(Duration::from_secs(5), slow.wait())
        .await
        .expect("task never finished")
        .unwrap();
    assert_eq!(*value, "finished");
}
