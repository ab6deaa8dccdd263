use std::{ops::Range, sync::Arc};

use nlpkit_scheduling_worker_pool::{BoxError, Handle, WorkerPool};
use tap::Tap;

use crate::{Chunk, ChunkFailure, ChunkPartitioner, Error, ExecutionConfig, MergePolicy, Result};

/// Runs a per-item function over a sequence in parallel chunks and merges the results.
///
/// The dispatcher borrows a [`WorkerPool`] owned by someone else; it never creates, resizes or
/// shuts down the pool. One task is submitted per chunk, and every chunk folds its items, in
/// order, into a private partial result. The caller's thread then awaits all chunks and merges
/// the partials in chunk order, so the outcome is independent of which chunk finishes first.
pub struct ParallelDispatcher<'a> {
    pool: &'a WorkerPool,
    partitioner: ChunkPartitioner,
}

impl<'a> ParallelDispatcher<'a> {
    pub fn new(pool: &'a WorkerPool, config: &ExecutionConfig) -> Self {
        Self { pool, partitioner: ChunkPartitioner::from_config(config) }
    }

    pub fn pool(&self) -> &WorkerPool {
        self.pool
    }

    pub fn partitioner(&self) -> &ChunkPartitioner {
        &self.partitioner
    }

    /// Applies `f` to every item of `items` using up to `threads` chunks (`0` means the configured
    /// available parallelism) and merges the outputs with `merge`.
    ///
    /// Fails if any item of any chunk fails. A failing item stops its own chunk only; every chunk
    /// that was submitted is awaited before the error is returned, and the results of the chunks
    /// that succeeded are discarded.
    pub fn dispatch<I, O, E, F, M>(
        &self,
        items: Vec<I>,
        f: F,
        threads: usize,
        merge: M,
    ) -> Result<M::Output>
    where
        I: Send + 'static,
        E: Into<BoxError>,
        F: Fn(I) -> std::result::Result<O, E> + Send + Sync + 'static,
        M: MergePolicy<O>,
    {
        let chunks = self.partitioner.partition(items.len(), threads);
        self.run_chunks(chunks, items, f, merge)
    }

    /// Applies `f` to every index in `range`, like [`dispatch`](Self::dispatch) over the indices.
    ///
    /// Chunks, and so any [`ChunkFailure`], carry absolute indices from `range`. Fails with
    /// [`Error::Partition`] when the range is inverted.
    pub fn dispatch_range<O, E, F, M>(
        &self,
        range: Range<usize>,
        f: F,
        threads: usize,
        merge: M,
    ) -> Result<M::Output>
    where
        E: Into<BoxError>,
        F: Fn(usize) -> std::result::Result<O, E> + Send + Sync + 'static,
        M: MergePolicy<O>,
    {
        let chunks = self.partitioner.partition_range(range.clone(), threads)?;
        self.run_chunks(chunks, range.collect(), f, merge)
    }

    /// Submits one task per chunk, where `items` holds the items of all chunks back to back.
    fn run_chunks<I, O, E, F, M>(
        &self,
        chunks: Vec<Chunk>,
        items: Vec<I>,
        f: F,
        merge: M,
    ) -> Result<M::Output>
    where
        I: Send + 'static,
        E: Into<BoxError>,
        F: Fn(I) -> std::result::Result<O, E> + Send + Sync + 'static,
        M: MergePolicy<O>,
    {
        log::debug!(
            "dispatching {} items in {} chunks on {} workers",
            items.len(),
            chunks.len(),
            self.pool.worker_count()
        );

        let f = Arc::new(f);
        let merge = Arc::new(merge);
        let mut items = items.into_iter();
        let mut submitted = Vec::with_capacity(chunks.len());
        let mut rejected = None;

        for chunk in &chunks {
            let chunk_items: Vec<I> = items.by_ref().take(chunk.len()).collect();
            let task = chunk_task(chunk_items, f.clone(), merge.clone());

            match self.pool.submit(task) {
                Ok(handle) => submitted.push((*chunk, handle)),
                Err(err) => {
                    rejected = Some(err);
                    break;
                }
            }
        }

        // Drain everything already submitted before reporting any failure.
        let (partials, failures) = await_chunks(submitted);

        if let Some(err) = rejected {
            return Err(err.into());
        }
        if !failures.is_empty() {
            return Err(Error::ChunksFailed { failures, total: chunks.len() }
                .tap(|err| log::warn!("parallel dispatch failed: {err}")));
        }

        Ok(merge.merge(partials))
    }
}

/// Builds the task for one chunk: applies `f` to each item in order, folding outputs into the
/// chunk's partial. Stops at the first failing item.
fn chunk_task<I, O, E, F, M>(
    items: Vec<I>,
    f: Arc<F>,
    merge: Arc<M>,
) -> impl FnOnce() -> std::result::Result<M::Partial, BoxError> + Send + 'static
where
    I: Send + 'static,
    E: Into<BoxError>,
    F: Fn(I) -> std::result::Result<O, E> + Send + Sync + 'static,
    M: MergePolicy<O>,
{
    move || {
        let mut partial = merge.empty(items.len());
        for item in items {
            let output = f(item).map_err(Into::<BoxError>::into)?;
            merge.fold(&mut partial, output);
        }
        Ok(partial)
    }
}

/// Waits for every chunk in chunk order. Returns the partials of successful chunks and the
/// failures, both ordered by chunk index.
fn await_chunks<P: Clone>(
    submitted: Vec<(Chunk, Handle<P>)>,
) -> (Vec<P>, Vec<ChunkFailure>) {
    let mut partials = Vec::with_capacity(submitted.len());
    let mut failures = Vec::new();

    for (chunk, handle) in submitted {
        match handle.into_result() {
            Ok(partial) => partials.push(partial),
            Err(error) => failures.push(ChunkFailure { chunk, error }),
        }
    }

    (partials, failures)
}

/// Runs one parallel map on a pool scoped to this call.
///
/// The pool is sized to the number of chunks the request produces and is shut down when the call
/// returns, on success and on failure alike.
pub fn parallel_map<I, O, E, F, M>(
    config: &ExecutionConfig,
    items: Vec<I>,
    f: F,
    threads: usize,
    merge: M,
) -> Result<M::Output>
where
    I: Send + 'static,
    E: Into<BoxError>,
    F: Fn(I) -> std::result::Result<O, E> + Send + Sync + 'static,
    M: MergePolicy<O>,
{
    let partitioner = ChunkPartitioner::from_config(config);
    let workers = partitioner.effective_threads(items.len(), threads);
    let pool = WorkerPool::new(config.pool_config().with_worker_count(workers))?;

    ParallelDispatcher::new(&pool, config).dispatch(items, f, threads, merge)
}

impl std::fmt::Debug for ParallelDispatcher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelDispatcher")
            .field("pool", self.pool)
            .field("partitioner", &self.partitioner)
            .finish()
    }
}
