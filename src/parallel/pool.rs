//! Worker pool backing the strip-parallel paths.
//!
//! Three backends:
//! - `sequential`: runs everything inline on the calling thread (one worker),
//! - `global`: Rayon's global pool, one worker per hardware thread,
//! - `with_threads(n)`: a dedicated Rayon pool with `n` workers.
//!
//! Without the `parallel` feature only the sequential backend exists and the
//! other constructors fall back to it.
use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("worker pool needs at least one thread")]
    ZeroThreads,
    #[cfg(feature = "parallel")]
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug)]
enum Backend {
    Sequential,
    #[cfg(feature = "parallel")]
    Global,
    #[cfg(feature = "parallel")]
    Dedicated(rayon::ThreadPool),
}

#[derive(Debug)]
pub struct WorkerPool {
    backend: Backend,
}

impl WorkerPool {
    pub fn sequential() -> Self {
        Self {
            backend: Backend::Sequential,
        }
    }

    pub fn global() -> Self {
        #[cfg(feature = "parallel")]
        {
            Self {
                backend: Backend::Global,
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            Self::sequential()
        }
    }

    /// Dedicated pool with exactly `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self, PoolError> {
        if threads == 0 {
            return Err(PoolError::ZeroThreads);
        }
        #[cfg(feature = "parallel")]
        {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("grid-worker-{i}"))
                .build()?;
            Ok(Self {
                backend: Backend::Dedicated(pool),
            })
        }
        #[cfg(not(feature = "parallel"))]
        {
            log::debug!("parallel feature disabled, ignoring request for {threads} workers");
            Ok(Self::sequential())
        }
    }

    /// `None` selects the global pool.
    pub fn from_threads(threads: Option<usize>) -> Result<Self, PoolError> {
        match threads {
            Some(n) => Self::with_threads(n),
            None => Ok(Self::global()),
        }
    }

    /// Number of workers a parallel region on this pool fans out to.
    pub fn current_num_threads(&self) -> usize {
        match &self.backend {
            Backend::Sequential => 1,
            #[cfg(feature = "parallel")]
            Backend::Global => rayon::current_num_threads(),
            #[cfg(feature = "parallel")]
            Backend::Dedicated(pool) => pool.current_num_threads(),
        }
    }

    /// Apply `op` to every item, fanning out over the workers.
    pub fn for_each<I, OP>(&self, items: Vec<I>, op: OP)
    where
        I: Send,
        OP: Fn(I) + Sync + Send,
    {
        match &self.backend {
            Backend::Sequential => items.into_iter().for_each(op),
            #[cfg(feature = "parallel")]
            Backend::Global => items.into_par_iter().for_each(op),
            #[cfg(feature = "parallel")]
            Backend::Dedicated(pool) => pool.install(|| items.into_par_iter().for_each(op)),
        }
    }

    /// Visit `data` in chunks of `chunk_len`, each batch of chunks sharing
    /// one private state built by `init`.
    ///
    /// Chunks are split into at most one batch per worker, so `init` runs at
    /// most `current_num_threads()` times per call. A failing `init` or `op`
    /// stops the traversal and the first error is returned.
    pub fn try_for_each_chunk_init<T, S, E, INIT, OP>(
        &self,
        data: &mut [T],
        chunk_len: usize,
        init: INIT,
        op: OP,
    ) -> Result<(), E>
    where
        T: Send,
        E: Clone + Send,
        INIT: Fn() -> Result<S, E> + Sync + Send,
        OP: Fn(&mut S, usize, &mut [T]) -> Result<(), E> + Sync + Send,
    {
        assert!(chunk_len > 0, "chunk length must be positive");
        if data.is_empty() {
            return Ok(());
        }
        match &self.backend {
            Backend::Sequential => {
                let mut state = init()?;
                for (i, chunk) in data.chunks_mut(chunk_len).enumerate() {
                    op(&mut state, i, chunk)?;
                }
                Ok(())
            }
            #[cfg(feature = "parallel")]
            Backend::Global => par_try_for_each_chunk(data, chunk_len, &init, &op),
            #[cfg(feature = "parallel")]
            Backend::Dedicated(pool) => {
                pool.install(|| par_try_for_each_chunk(data, chunk_len, &init, &op))
            }
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::global()
    }
}

#[cfg(feature = "parallel")]
fn par_try_for_each_chunk<T, S, E, INIT, OP>(
    data: &mut [T],
    chunk_len: usize,
    init: &INIT,
    op: &OP,
) -> Result<(), E>
where
    T: Send,
    E: Clone + Send,
    INIT: Fn() -> Result<S, E> + Sync + Send,
    OP: Fn(&mut S, usize, &mut [T]) -> Result<(), E> + Sync + Send,
{
    let chunks = data.len().div_ceil(chunk_len);
    let min_len = chunks.div_ceil(rayon::current_num_threads().max(1)).max(1);
    data.par_chunks_mut(chunk_len)
        .enumerate()
        .with_min_len(min_len)
        .try_for_each_init(init, |state, (i, chunk)| {
            let state = state.as_mut().map_err(|err| err.clone())?;
            op(state, i, chunk)
        })
}

/// Rows `[i·H/n, (i+1)·H/n)` of strip `i` out of `n`.
#[inline]
pub fn strip_rows(height: usize, n: usize, i: usize) -> Range<usize> {
    let n = n.max(1);
    (i * height / n)..((i + 1) * height / n)
}

/// Partition `height` rows into `n` contiguous strips covering all rows.
pub fn strip_partition(height: usize, n: usize) -> Vec<Range<usize>> {
    let n = n.max(1);
    (0..n).map(|i| strip_rows(height, n, i)).collect()
}
