//! Read-only rectangular views into shared images.
//!
//! An [`ImageView`] is the owning handle: it keeps its parent [`Image`]
//! alive and stores the window as a [`Rect`]. Borrowing it with
//! [`ImageView::view`] yields an [`AnyView`], a format-erased enum of typed
//! [`View`]s that give pixel access without copying.
//!
//! ```rust
//! use imgview_core::{Color, Image, PixelValue};
//!
//! let image = Image::filled(10, 10, Color::rgb(255, 0, 0));
//! let view = image.view(0, 0, 10, 10).unwrap();
//!
//! assert!(view.is_solid());
//! assert_eq!(view.get_pixel(5, 5), Some(PixelValue::Color(Color::rgb(255, 0, 0))));
//! assert_eq!(view.get_pixel(10, 0), None);
//! ```

use crate::image::ImageData;
use crate::{Buffer, Color, Error, Image, PixelFormat, PixelValue, Rect, Result, Sample};
use tracing::trace;

/// Typed, borrowed window into a [`Buffer`].
///
/// Coordinates passed to [`View::pixel`] and [`View::row`] are relative to
/// the window origin.
#[derive(Debug, Clone, Copy)]
pub struct View<'a, T: Sample> {
    buffer: &'a Buffer<T>,
    region: Rect,
}

impl<'a, T: Sample> View<'a, T> {
    pub(crate) fn new(buffer: &'a Buffer<T>, region: Rect) -> Self {
        debug_assert!(region.fits_within(buffer.width(), buffer.height()));
        Self { buffer, region }
    }

    /// Window width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.region.width
    }

    /// Window height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.region.height
    }

    /// Window position inside the parent buffer.
    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Returns the pixel at window-relative (x, y).
    ///
    /// The caller must ensure `x < width` and `y < height`; out-of-range
    /// coordinates read a neighbouring pixel of the parent or panic.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> T {
        self.buffer.pixel(self.region.x + x, self.region.y + y)
    }

    /// Returns row `y` of the window.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [T] {
        let row = self.buffer.row(self.region.y + y);
        let start = self.region.x as usize;
        &row[start..start + self.region.width as usize]
    }

    /// Iterates over the window rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.region.height).map(move |y| self.row(y))
    }

    /// Copies the window into a new owned buffer.
    pub fn to_buffer(&self) -> Buffer<T> {
        let mut data = Vec::with_capacity(self.region.area() as usize);
        for row in self.rows() {
            data.extend_from_slice(row);
        }
        Buffer::from_raw(self.region.width, self.region.height, data)
    }
}

/// Format-erased borrowed view: one variant per [`PixelFormat`].
#[derive(Debug, Clone, Copy)]
pub enum AnyView<'a> {
    /// 8-bit RGBA.
    Rgba8(View<'a, Color>),
    /// Unsigned 8-bit gray.
    Gray8(View<'a, u8>),
    /// Signed 8-bit gray.
    Gray8s(View<'a, i8>),
    /// Unsigned 16-bit gray.
    Gray16(View<'a, u16>),
    /// Signed 16-bit gray.
    Gray16s(View<'a, i16>),
    /// Unsigned 32-bit gray.
    Gray32(View<'a, u32>),
    /// Signed 32-bit gray.
    Gray32s(View<'a, i32>),
    /// 32-bit float gray.
    Gray32f(View<'a, f32>),
    /// Unsigned 64-bit gray.
    Gray64(View<'a, u64>),
    /// Signed 64-bit gray.
    Gray64s(View<'a, i64>),
    /// 64-bit float gray.
    Gray64f(View<'a, f64>),
}

/// Applies `$body` to the typed view inside an [`AnyView`].
#[macro_export]
macro_rules! with_view {
    ($view:expr, $v:ident => $body:expr) => {
        match $view {
            $crate::AnyView::Rgba8($v) => $body,
            $crate::AnyView::Gray8($v) => $body,
            $crate::AnyView::Gray8s($v) => $body,
            $crate::AnyView::Gray16($v) => $body,
            $crate::AnyView::Gray16s($v) => $body,
            $crate::AnyView::Gray32($v) => $body,
            $crate::AnyView::Gray32s($v) => $body,
            $crate::AnyView::Gray32f($v) => $body,
            $crate::AnyView::Gray64($v) => $body,
            $crate::AnyView::Gray64s($v) => $body,
            $crate::AnyView::Gray64f($v) => $body,
        }
    };
}

impl<'a> AnyView<'a> {
    fn new(data: &'a ImageData, region: Rect) -> Self {
        match data {
            ImageData::Rgba8(b) => AnyView::Rgba8(View::new(b, region)),
            ImageData::Gray8(b) => AnyView::Gray8(View::new(b, region)),
            ImageData::Gray8s(b) => AnyView::Gray8s(View::new(b, region)),
            ImageData::Gray16(b) => AnyView::Gray16(View::new(b, region)),
            ImageData::Gray16s(b) => AnyView::Gray16s(View::new(b, region)),
            ImageData::Gray32(b) => AnyView::Gray32(View::new(b, region)),
            ImageData::Gray32s(b) => AnyView::Gray32s(View::new(b, region)),
            ImageData::Gray32f(b) => AnyView::Gray32f(View::new(b, region)),
            ImageData::Gray64(b) => AnyView::Gray64(View::new(b, region)),
            ImageData::Gray64s(b) => AnyView::Gray64s(View::new(b, region)),
            ImageData::Gray64f(b) => AnyView::Gray64f(View::new(b, region)),
        }
    }

    /// Window width.
    pub fn width(&self) -> u32 {
        with_view!(self, v => v.width())
    }

    /// Window height.
    pub fn height(&self) -> u32 {
        with_view!(self, v => v.height())
    }

    /// Pixel format of the parent image.
    pub fn format(&self) -> PixelFormat {
        fn format_of<T: Sample>(_: &View<'_, T>) -> PixelFormat {
            T::FORMAT
        }
        with_view!(self, v => format_of(v))
    }
}

/// Owning view over a region of an [`Image`].
///
/// Holds a strong reference to the parent, so the pixel storage lives at
/// least as long as the view. Cloning shares the same parent.
#[derive(Debug, Clone)]
pub struct ImageView {
    image: Image,
    region: Rect,
}

impl ImageView {
    /// Creates a view over `region` of `image`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if the region does not fit inside
    /// the image.
    pub fn new(image: &Image, region: Rect) -> Result<Self> {
        if !region.fits_within(image.width(), image.height()) {
            return Err(Error::invalid_region(
                region.x,
                region.y,
                region.width,
                region.height,
                image.width(),
                image.height(),
            ));
        }
        trace!(%region, format = %image.format(), "view created");
        Ok(Self {
            image: image.clone(),
            region,
        })
    }

    /// View width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.region.width
    }

    /// View height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.region.height
    }

    /// Region of the parent image covered by this view.
    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Pixel format of the parent image.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.image.format()
    }

    /// The parent image.
    #[inline]
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Borrows the format-erased pixel window.
    pub fn view(&self) -> AnyView<'_> {
        AnyView::new(self.image.data(), self.region)
    }

    /// Creates a view over a sub-region, relative to this view's origin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if the sub-region exceeds this view.
    pub fn subview(&self, x: u32, y: u32, w: u32, h: u32) -> Result<ImageView> {
        let sub = Rect::new(x, y, w, h);
        if !sub.fits_within(self.region.width, self.region.height) {
            return Err(Error::invalid_region(
                x,
                y,
                w,
                h,
                self.region.width,
                self.region.height,
            ));
        }
        Ok(Self {
            image: self.image.clone(),
            region: Rect::new(self.region.x + x, self.region.y + y, w, h),
        })
    }

    /// Returns the pixel at view-relative (x, y), or `None` when the
    /// coordinates fall outside the view.
    ///
    /// Accepts signed coordinates so callers can pass untrusted input
    /// straight through.
    pub fn get_pixel(&self, x: i64, y: i64) -> Option<PixelValue> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width())?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height())?;
        Some(crate::sample(&self.view(), x, y))
    }

    /// Returns true if every pixel in the view has the same value.
    ///
    /// Zero-area and single-pixel views are solid.
    pub fn is_solid(&self) -> bool {
        crate::is_solid(&self.view())
    }
}
