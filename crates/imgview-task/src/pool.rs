//! Worker pools.
//!
//! The runner only needs "run this job somewhere else". Keeping that behind
//! [`WorkerPool`] leaves room for pools with cancellation or priorities
//! without touching the operations that run on them.

use crate::{RunnerConfig, TaskError, TaskResult};
use tracing::debug;

/// A unit of background work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Executes jobs off the caller's thread.
pub trait WorkerPool: Send + Sync {
    /// Schedules `job`. Must not run it inline on the calling thread.
    fn execute(&self, job: Job);

    /// Number of worker threads.
    fn threads(&self) -> usize;
}

/// [`WorkerPool`] backed by a dedicated `rayon` thread pool.
pub struct RayonPool {
    pool: rayon::ThreadPool,
}

impl RayonPool {
    /// Builds a pool from `config`.
    pub fn new(config: &RunnerConfig) -> TaskResult<Self> {
        let prefix = config.thread_name.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.resolved_threads())
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()
            .map_err(|e| TaskError::PoolBuild(e.to_string()))?;
        debug!(threads = pool.current_num_threads(), "worker pool started");
        Ok(Self { pool })
    }
}

impl WorkerPool for RayonPool {
    fn execute(&self, job: Job) {
        self.pool.spawn(job);
    }

    fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl std::fmt::Debug for RayonPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RayonPool")
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}
