//! Error types for the task runner.

use crate::TaskId;
use thiserror::Error;

/// Task runner error.
///
/// Operation errors are defined by the caller; they must implement
/// `From<TaskError>` so the runner can report its own failures through the
/// same completion callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The background operation panicked.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    PoolBuild(String),

    /// The worker side went away without producing a result.
    #[error("task {0} was dropped by the worker pool")]
    Dropped(TaskId),
}

/// Result type for runner operations.
pub type TaskResult<T> = Result<T, TaskError>;
