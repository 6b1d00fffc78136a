//! Error types for imgview-core operations.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of the core layer:
//! - Buffer construction (data length does not match the dimensions)
//! - View construction (region outside the parent image)
//! - Solidity probing of degenerate views
//!
//! # Usage
//!
//! ```rust
//! use imgview_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core image and view layer.
///
/// # Categories
///
/// - **Bounds errors**: [`OutOfBounds`](Error::OutOfBounds), [`InvalidRegion`](Error::InvalidRegion)
/// - **Dimension errors**: [`InvalidDimensions`](Error::InvalidDimensions)
/// - **Format errors**: [`UnknownPixelFormat`](Error::UnknownPixelFormat)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Pixel coordinates are outside image bounds.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: u32,
        /// Y coordinate that was out of bounds
        y: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// A view region extends beyond the parent image.
    ///
    /// Returned by [`crate::Image::view`] when `x + w > width` or
    /// `y + h > height`.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds image bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Invalid dimensions for the requested operation.
    ///
    /// Returned when pixel data does not match `width * height`, or when an
    /// operation that needs at least one pixel is given a zero-area view.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Width
        width: u32,
        /// Height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Pixel format name is not one of the supported formats.
    #[error("unknown pixel format: {0}")]
    UnknownPixelFormat(String),
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rx: u32, ry: u32, rw: u32, rh: u32, width: u32, height: u32) -> Self {
        Self::InvalidRegion {
            rx,
            ry,
            rw,
            rh,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::InvalidRegion { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(100, 50, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("80x60"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_invalid_region() {
        let err = Error::invalid_region(5, 5, 10, 10, 12, 12);
        assert_eq!(
            err.to_string(),
            "region (5, 5, 10x10) exceeds image bounds 12x12"
        );
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_invalid_dimensions() {
        let err = Error::invalid_dimensions(0, 4, "zero width");
        assert!(err.to_string().contains("0x4"));
        assert!(!err.is_bounds_error());
    }
}
