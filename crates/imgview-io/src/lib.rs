//! # imgview-io
//!
//! Encoding and decoding for [`imgview_core`] views.
//!
//! - [`encode_to_bytes`] - encode a view with a format string (`"png"`,
//!   `"png8"`, `"jpeg85"`, `"tiff"`)
//! - [`encode_to_file`] - encode and write, format taken from the string
//!   or guessed from the extension
//! - [`decode`] / [`read`] - decode bytes or files into an [`Image`]
//! - [`Palette`] - color table for indexed PNG
//! - [`Format`] / [`guess_format`] - format detection
//!
//! # Quick Start
//!
//! ```rust
//! use imgview_core::{Color, Image};
//! use imgview_io::{decode, encode_to_bytes};
//!
//! let image = Image::filled(8, 8, Color::rgb(255, 0, 0));
//! let view = image.view(2, 2, 4, 4).unwrap();
//!
//! let png = encode_to_bytes(&view, "png", None).unwrap();
//! let back = decode(&png).unwrap();
//! assert_eq!((back.width(), back.height()), (4, 4));
//! ```
//!
//! # Supported Formats
//!
//! | Format | View formats written | Decoded to |
//! |--------|----------------------|------------|
//! | PNG | rgba8, gray8, gray16 | rgba8, gray8, gray16 |
//! | JPEG | rgba8 (no alpha), gray8 | rgba8, gray8, gray16 |
//! | TIFF | rgba8, gray8/16/32/64, gray32f/64f | same |
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG support (default)
//! - `tiff` - TIFF support (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod encode;
mod error;
mod options;
pub mod palette;
mod pixels;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

#[cfg(feature = "tiff")]
pub mod tiff;

pub use detect::{Format, guess_format};
pub use encode::{encode, encode_to_bytes, encode_to_file, file_options};
pub use error::{IoError, IoResult};
pub use options::{EncodeOptions, JpegOptions, PngOptions, TiffCompression, TiffOptions};
pub use palette::Palette;

use imgview_core::Image;
use std::path::Path;

/// Decodes an encoded image, detecting the format from its magic bytes.
///
/// # Errors
///
/// - [`IoError::UnknownFormat`] if the bytes match no known signature
/// - [`IoError::UnsupportedFormat`] if the codec was not compiled in
/// - [`IoError::DecodeError`] on malformed data
pub fn decode(bytes: &[u8]) -> IoResult<Image> {
    match Format::from_bytes(bytes) {
        #[cfg(feature = "png")]
        Format::Png => png::decode(bytes),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::decode(bytes),

        #[cfg(feature = "tiff")]
        Format::Tiff => tiff::decode(bytes),

        Format::Unknown => Err(IoError::UnknownFormat("unrecognised image signature".into())),

        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(other.extension().to_string())),
    }
}

/// Reads and decodes an image file.
///
/// ```rust,ignore
/// let image = imgview_io::read("input.png")?;
/// println!("{}x{} {}", image.width(), image.height(), image.format());
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let image = decode(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        format = %image.format(),
        "image read"
    );
    Ok(image)
}
