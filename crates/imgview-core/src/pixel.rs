//! Pixel formats, sample types and pixel values.
//!
//! # Overview
//!
//! - [`PixelFormat`] - the closed set of in-memory pixel encodings
//! - [`Sample`] - trait implemented by the storage type of each encoding
//! - [`Color`] - 8-bit RGBA record, the storage type of [`PixelFormat::Rgba8`]
//! - [`PixelValue`] - what a pixel query returns, shaped by the format
//!
//! # Formats
//!
//! | Format | Storage | Sampled as |
//! |--------|---------|------------|
//! | `rgba8` | [`Color`] | [`PixelValue::Color`] |
//! | `gray8` / `gray8s` | `u8` / `i8` | [`PixelValue::Packed`] |
//! | `gray16` / `gray16s` | `u16` / `i16` | [`PixelValue::Packed`] |
//! | `gray32` / `gray32s` | `u32` / `i32` | [`PixelValue::Packed`] |
//! | `gray32f` | `f32` | [`PixelValue::Float`] |
//! | `gray64` / `gray64s` | `u64` / `i64` | [`PixelValue::Packed`] |
//! | `gray64f` | `f64` | [`PixelValue::Packed`] |
//!
//! Packing into `u32` saturates: negative samples become `0`, samples above
//! `u32::MAX` become `u32::MAX`, floats truncate toward zero and NaN packs
//! to `0`.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// In-memory encoding of one pixel.
///
/// The set is closed: code that dispatches on the format matches every
/// variant explicitly so that adding one is a compile error everywhere it
/// matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit RGBA, one [`Color`] per pixel.
    Rgba8,
    /// Unsigned 8-bit gray.
    Gray8,
    /// Signed 8-bit gray.
    Gray8s,
    /// Unsigned 16-bit gray.
    Gray16,
    /// Signed 16-bit gray.
    Gray16s,
    /// Unsigned 32-bit gray.
    Gray32,
    /// Signed 32-bit gray.
    Gray32s,
    /// 32-bit float gray.
    Gray32f,
    /// Unsigned 64-bit gray.
    Gray64,
    /// Signed 64-bit gray.
    Gray64s,
    /// 64-bit float gray.
    Gray64f,
}

impl PixelFormat {
    /// Every supported format, in declaration order.
    pub const ALL: [PixelFormat; 11] = [
        PixelFormat::Rgba8,
        PixelFormat::Gray8,
        PixelFormat::Gray8s,
        PixelFormat::Gray16,
        PixelFormat::Gray16s,
        PixelFormat::Gray32,
        PixelFormat::Gray32s,
        PixelFormat::Gray32f,
        PixelFormat::Gray64,
        PixelFormat::Gray64s,
        PixelFormat::Gray64f,
    ];

    /// Canonical lower-case name (`"rgba8"`, `"gray32f"`, ...).
    pub const fn name(&self) -> &'static str {
        match self {
            PixelFormat::Rgba8 => "rgba8",
            PixelFormat::Gray8 => "gray8",
            PixelFormat::Gray8s => "gray8s",
            PixelFormat::Gray16 => "gray16",
            PixelFormat::Gray16s => "gray16s",
            PixelFormat::Gray32 => "gray32",
            PixelFormat::Gray32s => "gray32s",
            PixelFormat::Gray32f => "gray32f",
            PixelFormat::Gray64 => "gray64",
            PixelFormat::Gray64s => "gray64s",
            PixelFormat::Gray64f => "gray64f",
        }
    }

    /// Bytes used to store one pixel.
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Gray8 | PixelFormat::Gray8s => 1,
            PixelFormat::Gray16 | PixelFormat::Gray16s => 2,
            PixelFormat::Rgba8
            | PixelFormat::Gray32
            | PixelFormat::Gray32s
            | PixelFormat::Gray32f => 4,
            PixelFormat::Gray64 | PixelFormat::Gray64s | PixelFormat::Gray64f => 8,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        PixelFormat::ALL
            .into_iter()
            .find(|format| format.name() == lower)
            .ok_or_else(|| Error::UnknownPixelFormat(s.to_string()))
    }
}

/// Storage type of a pixel format.
///
/// Implemented for [`Color`] and the primitive gray sample types. The
/// conversions are the building blocks of [`crate::sample`]; they never
/// decide which [`PixelValue`] variant a format produces.
pub trait Sample: Copy + PartialEq + Default + Send + Sync + fmt::Debug + 'static {
    /// The pixel format this type stores.
    const FORMAT: PixelFormat;

    /// Packs the sample into an unsigned 32-bit integer (saturating).
    fn to_packed(self) -> u32;

    /// Widens the sample to `f64`.
    fn to_f64(self) -> f64;
}

macro_rules! impl_sample_int {
    ($($t:ty => $format:ident),* $(,)?) => {
        $(
            impl Sample for $t {
                const FORMAT: PixelFormat = PixelFormat::$format;

                #[inline]
                fn to_packed(self) -> u32 {
                    u32::try_from(self).unwrap_or_else(|_| {
                        if self > (0 as $t) { u32::MAX } else { 0 }
                    })
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_sample_int! {
    u8 => Gray8,
    i8 => Gray8s,
    u16 => Gray16,
    i16 => Gray16s,
    u32 => Gray32,
    i32 => Gray32s,
    u64 => Gray64,
    i64 => Gray64s,
}

impl Sample for f32 {
    const FORMAT: PixelFormat = PixelFormat::Gray32f;

    // `as` saturates and maps NaN to 0.
    #[inline]
    fn to_packed(self) -> u32 {
        self as u32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    const FORMAT: PixelFormat = PixelFormat::Gray64f;

    #[inline]
    fn to_packed(self) -> u32 {
        self as u32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

/// 8-bit RGBA color.
///
/// Packs to `u32` with red in the low byte:
/// `a << 24 | b << 16 | g << 8 | r`, so opaque red is `0xFF0000FF`.
///
/// ```rust
/// use imgview_core::Color;
///
/// let red = Color::rgb(255, 0, 0);
/// assert_eq!(red.packed(), 0xFF0000FF);
/// assert_eq!(Color::from_packed(0xFF0000FF), red);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Color {
    /// Creates a color from all four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Fully transparent black.
    #[inline]
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Unpacks from the `a << 24 | b << 16 | g << 8 | r` layout.
    #[inline]
    pub const fn from_packed(v: u32) -> Self {
        Self::new(v as u8, (v >> 8) as u8, (v >> 16) as u8, (v >> 24) as u8)
    }

    /// Packs into the `a << 24 | b << 16 | g << 8 | r` layout.
    #[inline]
    pub const fn packed(&self) -> u32 {
        (self.a as u32) << 24 | (self.b as u32) << 16 | (self.g as u32) << 8 | self.r as u32
    }

    /// Channels as `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns true if alpha is 255.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Multiplies the color channels by alpha.
    pub fn premultiply(self) -> Self {
        let a = self.a as u32;
        let mul = |c: u8| ((c as u32 * a + 127) / 255) as u8;
        Self::new(mul(self.r), mul(self.g), mul(self.b), self.a)
    }

    /// Divides the color channels by alpha.
    ///
    /// Fully transparent pixels become transparent black.
    pub fn demultiply(self) -> Self {
        match self.a {
            0 => Self::transparent(),
            255 => self,
            a => {
                let a = a as u32;
                let div = |c: u8| ((c as u32 * 255 + a / 2) / a).min(255) as u8;
                Self::new(div(self.r), div(self.g), div(self.b), self.a)
            }
        }
    }
}

impl Sample for Color {
    const FORMAT: PixelFormat = PixelFormat::Rgba8;

    #[inline]
    fn to_packed(self) -> u32 {
        self.packed()
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self.packed() as f64
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "rgb({},{},{})", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "rgba({},{},{},{:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f64 / 255.0
            )
        }
    }
}

/// Result of sampling one pixel.
///
/// Exactly one variant is produced per [`PixelFormat`]; see
/// [`crate::sample`] for the dispatch rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelValue {
    /// Sample packed into an unsigned 32-bit integer.
    Packed(u32),
    /// Floating-point sample.
    Float(f64),
    /// RGBA color.
    Color(Color),
}

impl PixelValue {
    /// Returns the packed integer, if this is [`PixelValue::Packed`].
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            PixelValue::Packed(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float, if this is [`PixelValue::Float`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PixelValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the color, if this is [`PixelValue::Color`].
    pub fn as_color(&self) -> Option<Color> {
        match self {
            PixelValue::Color(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for PixelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelValue::Packed(v) => write!(f, "{v}"),
            PixelValue::Float(v) => write!(f, "{v}"),
            PixelValue::Color(c) => write!(f, "{c}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names_roundtrip() {
        for format in PixelFormat::ALL {
            assert_eq!(format.name().parse::<PixelFormat>().unwrap(), format);
        }
        assert_eq!("GRAY32F".parse::<PixelFormat>().unwrap(), PixelFormat::Gray32f);
        assert!("gray12".parse::<PixelFormat>().is_err());
    }

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(PixelFormat::Rgba8.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::Gray8s.bytes_per_pixel(), 1);
        assert_eq!(PixelFormat::Gray16.bytes_per_pixel(), 2);
        assert_eq!(PixelFormat::Gray64f.bytes_per_pixel(), 8);
    }

    #[test]
    fn test_packing_saturates() {
        assert_eq!((-5i8).to_packed(), 0);
        assert_eq!(200u8.to_packed(), 200);
        assert_eq!((-1i32).to_packed(), 0);
        assert_eq!(u64::MAX.to_packed(), u32::MAX);
        assert_eq!(70_000i64.to_packed(), 70_000);
        assert_eq!(3.9f64.to_packed(), 3);
        assert_eq!((-2.0f64).to_packed(), 0);
        assert_eq!(f64::NAN.to_packed(), 0);
        assert_eq!(f32::INFINITY.to_packed(), u32::MAX);
    }

    #[test]
    fn test_color_packing() {
        let c = Color::new(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.packed(), 0x44332211);
        assert_eq!(Color::from_packed(c.packed()), c);
        assert_eq!(Color::rgb(255, 0, 0).packed(), 0xFF0000FF);
    }

    #[test]
    fn test_premultiply_demultiply() {
        let c = Color::new(200, 100, 50, 128);
        let pre = c.premultiply();
        assert_eq!(pre, Color::new(100, 50, 25, 128));
        let back = pre.demultiply();
        assert!((back.r as i32 - 200).abs() <= 2);
        assert!((back.g as i32 - 100).abs() <= 2);
        assert_eq!(Color::new(9, 9, 9, 0).demultiply(), Color::transparent());
        assert_eq!(Color::rgb(1, 2, 3).demultiply(), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::rgb(255, 0, 0).to_string(), "rgb(255,0,0)");
        assert_eq!(Color::new(0, 0, 0, 0).to_string(), "rgba(0,0,0,0.000)");
    }

    #[test]
    fn test_pixel_value_accessors() {
        let v = PixelValue::Packed(7);
        assert_eq!(v.as_u32(), Some(7));
        assert_eq!(v.as_f64(), None);
        let c = PixelValue::Color(Color::rgb(1, 2, 3));
        assert_eq!(c.as_color(), Some(Color::rgb(1, 2, 3)));
        assert_eq!(PixelValue::Float(0.5).to_string(), "0.5");
    }
}
