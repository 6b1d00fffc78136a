//! Task identity and lifecycle state.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Identifier of a submitted task, unique per runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl TaskId {
    /// Numeric value of the id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a task.
///
/// ```text
/// Created -> Queued -> Running -> Completed
/// ```
///
/// A task stays `Running` after its operation returns or panics, until the
/// runner dispatches the callback on its own thread during
/// [`crate::TaskRunner::poll`] or [`crate::TaskRunner::run`]. `Completed`
/// is set once the callback has returned and the hold is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskState {
    /// Request validated, task allocated.
    Created = 0,
    /// Handed to the worker pool.
    Queued = 1,
    /// Picked up by a worker.
    Running = 2,
    /// Callback invoked and returned.
    Completed = 3,
}

impl TaskState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => TaskState::Created,
            1 => TaskState::Queued,
            2 => TaskState::Running,
            _ => TaskState::Completed,
        }
    }
}

/// Shared, atomically updated task state.
#[derive(Debug, Clone)]
pub(crate) struct StateCell(Arc<AtomicU8>);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicU8::new(TaskState::Created as u8)))
    }

    pub(crate) fn set(&self, state: TaskState) {
        self.0.store(state as u8, Ordering::Release);
    }

    pub(crate) fn get(&self) -> TaskState {
        TaskState::from_u8(self.0.load(Ordering::Acquire))
    }
}

/// Observer for a submitted task.
///
/// Holds no reference to the task's data; dropping it has no effect on the
/// task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    state: StateCell,
}

impl TaskHandle {
    pub(crate) fn new(id: TaskId, state: StateCell) -> Self {
        Self { id, state }
    }

    /// Task id.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        self.state.get()
    }

    /// True once the callback has run.
    pub fn is_completed(&self) -> bool {
        self.state() == TaskState::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_cell() {
        let cell = StateCell::new();
        let handle = TaskHandle::new(TaskId(7), cell.clone());
        assert_eq!(handle.state(), TaskState::Created);
        cell.set(TaskState::Running);
        assert_eq!(handle.state(), TaskState::Running);
        cell.set(TaskState::Completed);
        assert!(handle.is_completed());
        assert_eq!(handle.id().to_string(), "#7");
    }
}
