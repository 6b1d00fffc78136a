//! # imgview-core
//!
//! Read-only region views over shared raster images.
//!
//! - [`Image`] - immutable, reference-counted pixel buffer in one of the
//!   [`PixelFormat`]s
//! - [`ImageView`] - owning window `(x, y, w, h)` into an image
//! - [`AnyView`] / [`View`] - borrowed, format-erased and typed pixel access
//! - [`sample`] - per-format pixel sampling into a [`PixelValue`]
//! - [`is_solid`] / [`probe`] - uniform-color detection
//!
//! ## Lifetimes
//!
//! Views never copy pixels. Each [`ImageView`] holds a strong reference to
//! its parent [`Image`], so the buffer outlives every view and every
//! background task that holds a view. Nothing mutates pixels after an
//! image is built.
//!
//! ```rust
//! use imgview_core::prelude::*;
//!
//! let image = Image::filled(10, 10, Color::rgb(255, 0, 0));
//! let left = image.view(0, 0, 6, 10)?;
//! let right = image.view(4, 0, 6, 10)?;
//!
//! // overlapping windows see the same pixels
//! assert_eq!(left.get_pixel(5, 3), right.get_pixel(1, 3));
//! # Ok::<(), imgview_core::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! imgview-core (this crate)
//!    ^
//!    +-- imgview-io   (codecs, encode to bytes / file)
//!    +-- imgview-task (background runner)
//!    +-- imgview-host (scripting surface)
//!    +-- imgview-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;
pub mod rect;
pub mod sample;
pub mod solid;
pub mod view;

pub use error::*;
pub use image::{Buffer, Image, ImageData, WeakImage};
pub use pixel::{Color, PixelFormat, PixelValue, Sample};
pub use rect::Rect;
pub use sample::sample;
pub use solid::{PARALLEL_THRESHOLD, Solidity, is_solid, probe};
pub use view::{AnyView, ImageView, View};

/// Prelude module for convenient imports.
///
/// ```
/// use imgview_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{Buffer, Image};
    pub use crate::pixel::{Color, PixelFormat, PixelValue};
    pub use crate::rect::Rect;
    pub use crate::view::{AnyView, ImageView};
}
