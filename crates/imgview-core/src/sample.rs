//! Format-polymorphic pixel sampling.
//!
//! [`sample`] is the single place that decides which [`PixelValue`] variant
//! a pixel format produces:
//!
//! - `gray32f` returns [`PixelValue::Float`]
//! - `rgba8` returns [`PixelValue::Color`]
//! - every other format returns [`PixelValue::Packed`]
//!
//! The match below lists each [`AnyView`] variant explicitly. A new pixel
//! format fails to compile here until it is given a sampling rule.

use crate::{AnyView, PixelValue, Sample};

/// Samples the pixel at view-relative (x, y).
///
/// Coordinates are not bounds-checked at this layer. Use
/// [`crate::ImageView::get_pixel`] for untrusted input.
#[inline]
pub fn sample(view: &AnyView<'_>, x: u32, y: u32) -> PixelValue {
    match view {
        AnyView::Gray32f(v) => PixelValue::Float(v.pixel(x, y).to_f64()),
        AnyView::Rgba8(v) => PixelValue::Color(v.pixel(x, y)),
        AnyView::Gray8(v) => PixelValue::Packed(v.pixel(x, y).to_packed()),
        AnyView::Gray8s(v) => PixelValue::Packed(v.pixel(x, y).to_packed()),
        AnyView::Gray16(v) => PixelValue::Packed(v.pixel(x, y).to_packed()),
        AnyView::Gray16s(v) => PixelValue::Packed(v.pixel(x, y).to_packed()),
        AnyView::Gray32(v) => PixelValue::Packed(v.pixel(x, y).to_packed()),
        AnyView::Gray32s(v) => PixelValue::Packed(v.pixel(x, y).to_packed()),
        AnyView::Gray64(v) => PixelValue::Packed(v.pixel(x, y).to_packed()),
        AnyView::Gray64s(v) => PixelValue::Packed(v.pixel(x, y).to_packed()),
        AnyView::Gray64f(v) => PixelValue::Packed(v.pixel(x, y).to_packed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Image, PixelFormat};
    use approx::assert_relative_eq;

    fn sample_origin(image: &Image) -> PixelValue {
        let view = image.view(0, 0, 1, 1).unwrap();
        sample(&view.view(), 0, 0)
    }

    #[test]
    fn test_variant_per_format() {
        for format in PixelFormat::ALL {
            let value = sample_origin(&Image::blank(1, 1, format));
            match format {
                PixelFormat::Gray32f => assert!(matches!(value, PixelValue::Float(_))),
                PixelFormat::Rgba8 => assert!(matches!(value, PixelValue::Color(_))),
                _ => assert!(matches!(value, PixelValue::Packed(0)), "{format}"),
            }
        }
    }

    #[test]
    fn test_gray32f_widens() {
        let value = sample_origin(&Image::filled(1, 1, 0.25f32));
        assert_relative_eq!(value.as_f64().unwrap(), 0.25);
    }

    #[test]
    fn test_gray64f_packs() {
        assert_eq!(sample_origin(&Image::filled(1, 1, 42.9f64)), PixelValue::Packed(42));
    }

    #[test]
    fn test_signed_clamps() {
        assert_eq!(sample_origin(&Image::filled(1, 1, -7i16)), PixelValue::Packed(0));
        assert_eq!(
            sample_origin(&Image::filled(1, 1, i64::MAX)),
            PixelValue::Packed(u32::MAX)
        );
    }

    #[test]
    fn test_rgba_color() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(sample_origin(&Image::filled(1, 1, red)), PixelValue::Color(red));
    }
}
