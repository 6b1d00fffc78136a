//! Color-reduction palettes for indexed PNG output.
//!
//! A [`Palette`] holds 1 to 256 RGBA entries. Encoding a full-color view
//! against a palette maps every pixel to its nearest entry by squared RGBA
//! distance. A palette is an immutable table and can be shared between
//! concurrent encodes; per-encode lookup memos live in the encoder.
//!
//! ```rust
//! use imgview_core::Color;
//! use imgview_io::Palette;
//!
//! let palette = Palette::from_rgb_bytes(&[0, 0, 0, 255, 255, 255]).unwrap();
//! assert_eq!(palette.len(), 2);
//! assert_eq!(palette.nearest(Color::rgb(200, 210, 220)), 1);
//! ```

use crate::{IoError, IoResult};
use imgview_core::Color;
use std::fmt;

/// Maximum number of palette entries.
pub const MAX_COLORS: usize = 256;

/// Fixed color table used to quantize RGBA pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Creates a palette from a list of colors.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidPalette`] if the list is empty or longer
    /// than [`MAX_COLORS`].
    pub fn new(colors: Vec<Color>) -> IoResult<Self> {
        if colors.is_empty() || colors.len() > MAX_COLORS {
            return Err(IoError::InvalidPalette(format!(
                "palette must have 1-{MAX_COLORS} colors, got {}",
                colors.len()
            )));
        }
        Ok(Self { colors })
    }

    /// Parses packed `r g b a` quadruplets.
    pub fn from_rgba_bytes(bytes: &[u8]) -> IoResult<Self> {
        if bytes.len() % 4 != 0 {
            return Err(IoError::InvalidPalette(format!(
                "rgba palette length {} is not a multiple of 4",
                bytes.len()
            )));
        }
        Self::new(
            bytes
                .chunks_exact(4)
                .map(|c| Color::new(c[0], c[1], c[2], c[3]))
                .collect(),
        )
    }

    /// Parses packed `r g b` triplets (Adobe `.act` style); every entry is
    /// opaque.
    pub fn from_rgb_bytes(bytes: &[u8]) -> IoResult<Self> {
        if bytes.len() % 3 != 0 {
            return Err(IoError::InvalidPalette(format!(
                "rgb palette length {} is not a multiple of 3",
                bytes.len()
            )));
        }
        Self::new(
            bytes
                .chunks_exact(3)
                .map(|c| Color::rgb(c[0], c[1], c[2]))
                .collect(),
        )
    }

    /// Palette entries.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Number of entries (1..=256).
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; palettes have at least one entry.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns true if any entry is not fully opaque.
    pub fn has_alpha(&self) -> bool {
        self.colors.iter().any(|c| !c.is_opaque())
    }

    /// Index of the entry closest to `color`. Ties go to the lower index.
    pub fn nearest(&self, color: Color) -> u8 {
        self.colors
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| distance(**entry, color))
            .map_or(0, |(i, _)| i as u8)
    }

    /// `PLTE` chunk payload: packed RGB triplets.
    pub fn rgb_table(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
    }

    /// `tRNS` chunk payload: alpha per entry, trimmed after the last
    /// non-opaque entry. `None` when every entry is opaque.
    pub fn alpha_table(&self) -> Option<Vec<u8>> {
        let last = self.colors.iter().rposition(|c| !c.is_opaque())?;
        Some(self.colors[..=last].iter().map(|c| c.a).collect())
    }
}

fn distance(a: Color, b: Color) -> u32 {
    let d = |x: u8, y: u8| {
        let v = x as i32 - y as i32;
        (v * v) as u32
    };
    d(a.r, b.r) + d(a.g, b.g) + d(a.b, b.b) + d(a.a, b.a)
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Palette")
            .field("len", &self.colors.len())
            .field("has_alpha", &self.has_alpha())
            .finish()
    }
}
