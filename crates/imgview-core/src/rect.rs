//! Rectangle type for view regions.
//!
//! # Coordinate System
//!
//! All coordinates use the standard image convention:
//! - Origin (0, 0) is at the **top-left** corner
//! - X increases to the right
//! - Y increases downward
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │  Image   │
//!   │   │  Region  │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! # Usage
//!
//! ```rust
//! use imgview_core::Rect;
//!
//! let rect = Rect::new(10, 20, 100, 50);
//! assert!(rect.contains(15, 25));
//! assert!(rect.fits_within(110, 70));
//! assert!(!rect.fits_within(109, 70));
//! ```

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// A rectangle with zero width or height is empty; empty rectangles are
/// still valid view regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: u32,
    /// Y coordinate of the top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from origin (0, 0) with given dimensions.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns the X coordinate of the right edge (exclusive).
    ///
    /// Widened to `u64` so regions near `u32::MAX` cannot wrap.
    #[inline]
    pub const fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Returns the Y coordinate of the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Returns the area of the rectangle in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns `true` if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if the point (px, py) is inside this rectangle.
    ///
    /// Inclusive on the left/top edges, exclusive on the right/bottom edges.
    #[inline]
    pub const fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && (px as u64) < self.right() && py >= self.y && (py as u64) < self.bottom()
    }

    /// Returns `true` if the rectangle lies entirely inside a
    /// `width x height` image, i.e. `x + w <= width` and `y + h <= height`.
    #[inline]
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }

    /// Returns the intersection of this rectangle with another.
    ///
    /// Returns `None` if the rectangles don't overlap.
    ///
    /// ```rust
    /// use imgview_core::Rect;
    ///
    /// let a = Rect::new(0, 0, 100, 100);
    /// let b = Rect::new(50, 50, 100, 100);
    /// assert_eq!(a.intersect(&b), Some(Rect::new(50, 50, 50, 50)));
    /// ```
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if (x as u64) < right && (y as u64) < bottom {
            Some(Rect::new(x, y, (right - x as u64) as u32, (bottom - y as u64) as u32))
        } else {
            None
        }
    }

    /// Splits this rectangle into a grid of tiles of at most
    /// `tile_w x tile_h`, row by row. Edge tiles are truncated.
    ///
    /// ```rust
    /// use imgview_core::Rect;
    ///
    /// let tiles: Vec<_> = Rect::from_size(5, 3).tiles(4, 2).collect();
    /// assert_eq!(tiles.len(), 4);
    /// assert_eq!(tiles[1], Rect::new(4, 0, 1, 2));
    /// assert_eq!(tiles[3], Rect::new(4, 2, 1, 1));
    /// ```
    pub fn tiles(&self, tile_w: u32, tile_h: u32) -> impl Iterator<Item = Rect> + use<> {
        let tile_w = tile_w.max(1);
        let tile_h = tile_h.max(1);
        let origin = *self;
        let num_tiles_x = self.width.div_ceil(tile_w);
        let num_tiles_y = self.height.div_ceil(tile_h);

        (0..num_tiles_y).flat_map(move |ty| {
            (0..num_tiles_x).map(move |tx| {
                let x = tx * tile_w;
                let y = ty * tile_h;
                let w = (origin.width - x).min(tile_w);
                let h = (origin.height - y).min(tile_h);
                Rect::new(origin.x + x, origin.y + y, w, h)
            })
        })
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.right(), 110);
        assert_eq!(r.bottom(), 70);
        assert_eq!(r.area(), 5000);
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10, 10, 100, 100);
        assert!(r.contains(10, 10));
        assert!(r.contains(109, 109));
        assert!(!r.contains(110, 110));
        assert!(!r.contains(5, 50));
    }

    #[test]
    fn test_rect_fits_within() {
        assert!(Rect::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(Rect::new(10, 10, 0, 0).fits_within(10, 10));
        assert!(!Rect::new(1, 0, 10, 10).fits_within(10, 10));
        assert!(!Rect::new(0, 0, 10, 11).fits_within(10, 10));
        assert!(!Rect::new(u32::MAX, 0, 2, 1).fits_within(u32::MAX, 1));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        assert_eq!(a.intersect(&b), Some(Rect::new(50, 50, 50, 50)));
        assert!(a.intersect(&Rect::new(200, 200, 50, 50)).is_none());
    }

    #[test]
    fn test_rect_tiles_cover_region() {
        let region = Rect::new(3, 7, 10, 10);
        let tiles: Vec<_> = region.tiles(4, 4).collect();
        assert_eq!(tiles.len(), 9);
        let area: u64 = tiles.iter().map(Rect::area).sum();
        assert_eq!(area, region.area());
        assert_eq!(tiles[0], Rect::new(3, 7, 4, 4));
        assert_eq!(tiles[8], Rect::new(11, 15, 2, 2));
    }

    #[test]
    fn test_rect_tiles_empty() {
        assert_eq!(Rect::from_size(0, 10).tiles(4, 4).count(), 0);
    }
}
