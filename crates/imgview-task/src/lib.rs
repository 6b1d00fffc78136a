//! # imgview-task
//!
//! Background execution with caller-side completion callbacks.
//!
//! - [`TaskRunner`] - submits work to a [`WorkerPool`] and dispatches each
//!   task's callback exactly once, on the thread that owns the runner
//! - [`WorkerPool`] / [`RayonPool`] - where work actually runs
//! - [`TaskHandle`] / [`TaskState`] - observe a task's lifecycle
//! - [`RunnerConfig`] - pool sizing and thread naming
//!
//! Work closures receive a shared reference to a `hold` value that the
//! runner keeps alive until the callback has returned. Submitting an
//! image view as the hold keeps the parent image alive for the whole
//! queued, running and callback window, whatever the caller does with its
//! own handles.
//!
//! ```rust
//! use imgview_core::{Color, Image};
//! use imgview_task::{RunnerConfig, TaskError, TaskRunner};
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::sync::Arc;
//!
//! let runner = TaskRunner::new(&RunnerConfig::default())?;
//! let image = Image::filled(4, 4, Color::rgb(0, 0, 255));
//! let view = Arc::new(image.view(0, 0, 4, 4).unwrap());
//! drop(image);
//!
//! let solid = Rc::new(Cell::new(false));
//! let out = solid.clone();
//! runner.submit(
//!     view,
//!     |v| Ok::<_, TaskError>(v.is_solid()),
//!     move |r| out.set(r.unwrap()),
//! );
//! runner.run();
//! assert!(solid.get());
//! # Ok::<(), TaskError>(())
//! ```
//!
//! There is no cancellation: once submitted, a task runs to completion.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod pool;
mod runner;
mod task;

pub use config::RunnerConfig;
pub use error::{TaskError, TaskResult};
pub use pool::{Job, RayonPool, WorkerPool};
pub use runner::TaskRunner;
pub use task::{TaskHandle, TaskId, TaskState};

pub(crate) use task::StateCell;
