//! Uniform-color detection.
//!
//! Two entry points with deliberately different treatment of empty views:
//!
//! | Input | [`is_solid`] | [`probe`] |
//! |-------|--------------|-----------|
//! | zero area | `true` | `Err(InvalidDimensions)` |
//! | one pixel | `true` | `Ok(solid, value)` |
//! | uniform | `true` | `Ok(solid, value)` |
//! | mixed | `false` | `Ok(not solid)` |
//!
//! Samples are compared with `==`, so a view containing NaN is never solid
//! unless it is a single pixel.

use crate::{AnyView, Error, PixelValue, Result, Sample, View, sample, with_view};
use rayon::prelude::*;
use tracing::trace;

/// Views with at least this many pixels are scanned row-parallel.
pub const PARALLEL_THRESHOLD: u64 = 256 * 256;

/// Outcome of [`probe`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solidity {
    /// True if every pixel equals the first.
    pub solid: bool,
    /// Value of pixel (0, 0), present only when `solid`.
    pub value: Option<PixelValue>,
}

fn uniform<T: Sample>(view: &View<'_, T>) -> bool {
    let area = view.region().area();
    if area <= 1 {
        return true;
    }
    let first = view.pixel(0, 0);
    let row_uniform = |y: u32| view.row(y).iter().all(|p| *p == first);
    if area >= PARALLEL_THRESHOLD {
        (0..view.height()).into_par_iter().all(row_uniform)
    } else {
        (0..view.height()).all(row_uniform)
    }
}

/// Returns true if every pixel in the view has the same value.
///
/// Zero-area and single-pixel views are solid.
pub fn is_solid(view: &AnyView<'_>) -> bool {
    let solid = with_view!(view, v => uniform(v));
    trace!(
        width = view.width(),
        height = view.height(),
        format = %view.format(),
        solid,
        "solidity scan"
    );
    solid
}

/// Solidity check that also reports the fill value.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] when the view has zero width or
/// height.
pub fn probe(view: &AnyView<'_>) -> Result<Solidity> {
    let (width, height) = (view.width(), view.height());
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "image does not have valid dimensions",
        ));
    }
    let solid = is_solid(view);
    Ok(Solidity {
        solid,
        value: solid.then(|| sample(view, 0, 0)),
    })
}
