//! Dedicated thread pool for solves.

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// Runs solves away from the caller's threads. Parallel work inside a solve
/// (matrix rows) stays on this pool.
///
/// Jobs handed to the pool must not wait on anything that is itself waiting
/// for a pool thread, such as a plan cache entry.
#[derive(Debug)]
pub struct SolvePool {
    pool: ThreadPool,
}

impl SolvePool {
    /// `threads == 0` lets rayon pick.
    pub fn new(threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("solve-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `job` on the pool and block until it returns.
    pub fn install<T, F>(&self, job: F) -> T
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        self.pool.install(job)
    }
}
