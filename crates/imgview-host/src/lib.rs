//! # imgview-host
//!
//! The scripting surface over [`imgview_core`] views: dynamically typed
//! arguments in, [`Value`]s out, argument errors raised synchronously and
//! asynchronous results delivered to error-first callbacks.
//!
//! ```rust
//! use imgview_core::{Color, Image};
//! use imgview_host::{Host, Value};
//! use imgview_task::RunnerConfig;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let host = Host::new(&RunnerConfig::default())?;
//! let image = host.image(Image::filled(10, 10, Color::rgb(255, 0, 0)));
//! let view = image.view(&[0.into(), 0.into(), 10.into(), 10.into()])?;
//!
//! assert_eq!(view.is_solid_sync(), Value::Bool(true));
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let out = seen.clone();
//! view.is_solid(&[Value::function(move |args| *out.borrow_mut() = args)])?;
//! host.run();
//!
//! let red = Value::Color(Color::rgb(255, 0, 0));
//! assert_eq!(*seen.borrow(), vec![Value::Null, Value::Bool(true), red]);
//! # Ok::<(), imgview_host::HostError>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod host;
mod value;
mod view;

pub use error::{HostError, HostResult};
pub use host::{Host, ImageObject};
pub use value::{Callback, Value};
pub use view::ImageViewObject;
