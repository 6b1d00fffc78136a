//! Runner configuration.

/// Configuration for the default worker pool.
///
/// ```rust
/// use imgview_task::RunnerConfig;
///
/// let config = RunnerConfig::new().with_threads(4).with_thread_name("tiles");
/// assert_eq!(config.resolved_threads(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Worker threads; `0` picks one per available core.
    pub threads: usize,
    /// Prefix for worker thread names (`{prefix}-{index}`).
    pub thread_name: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            thread_name: "imgview-worker".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the worker thread count (`0` = automatic).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the worker thread name prefix.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Thread count with `0` resolved to the available parallelism.
    pub fn resolved_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            std::thread::available_parallelism().map_or(1, |n| n.get())
        }
    }
}
