//! Pixel extraction shared by the codecs.

use imgview_core::{Color, Sample, View};

/// Copies the window's RGBA pixels, demultiplying premultiplied alpha.
pub(crate) fn rgba_pixels(view: &View<'_, Color>, premultiplied: bool) -> Vec<Color> {
    let mut out = view.to_buffer().into_vec();
    if premultiplied {
        for px in &mut out {
            *px = px.demultiply();
        }
    }
    out
}

/// Copies RGBA pixels as packed `r g b a` bytes.
pub(crate) fn rgba_bytes(view: &View<'_, Color>, premultiplied: bool) -> Vec<u8> {
    rgba_pixels(view, premultiplied)
        .into_iter()
        .flat_map(Color::to_array)
        .collect()
}

/// Copies the window's samples in row-major order.
pub(crate) fn samples<T: Sample>(view: &View<'_, T>) -> Vec<T> {
    view.to_buffer().into_vec()
}
