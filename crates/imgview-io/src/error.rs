//! Error types for encoding and decoding.

use std::io;
use thiserror::Error;

/// Encode / decode error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Format name or file extension is not recognised.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// Format is recognised but support for it was not compiled in.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The codec cannot store views of this pixel format.
    #[error("{codec} cannot encode {format} pixels")]
    UnsupportedPixelFormat {
        /// Codec name.
        codec: &'static str,
        /// Pixel format of the view.
        format: imgview_core::PixelFormat,
    },

    /// Malformed `key=value` option in a format string.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// Palette data is malformed.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// Codec failure while encoding.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Codec failure while decoding.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Error from the core image layer.
    #[error(transparent)]
    Core(#[from] imgview_core::Error),
}

/// Result type for encode / decode operations.
pub type IoResult<T> = Result<T, IoError>;
