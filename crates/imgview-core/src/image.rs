//! Image buffers.
//!
//! - [`Buffer`] - owned, mutable, typed pixel grid used to build images
//! - [`ImageData`] - a buffer of any [`PixelFormat`]
//! - [`Image`] - immutable, reference-counted handle shared by views
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom, with no row
//! padding. An `rgba8` pixel is one [`Color`].
//!
//! # Sharing
//!
//! [`Image`] wraps its data in an [`Arc`]. Cloning an image or creating a
//! view bumps the count; the pixel storage is freed when the last image
//! handle, view, or in-flight task holding a view is dropped. Nothing can
//! mutate pixels once they are inside an [`Image`].
//!
//! ```rust
//! use imgview_core::{Buffer, Color, Image};
//!
//! let mut buf = Buffer::filled(4, 4, Color::rgb(0, 0, 255));
//! buf.set_pixel(1, 1, Color::rgb(255, 0, 0));
//! let image = Image::from(buf);
//!
//! let view = image.view(1, 1, 2, 2).unwrap();
//! assert_eq!(view.width(), 2);
//! ```

use crate::{Color, Error, ImageView, PixelFormat, Rect, Result, Sample};
use std::sync::{Arc, Weak};

/// Owned pixel grid of one sample type.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer<T: Sample> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Sample> Buffer<T> {
    /// Creates a buffer filled with the default sample (zero / transparent).
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, T::default())
    }

    /// Creates a buffer filled with `value`.
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Wraps existing row-major pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub(crate) fn from_raw(width: u32, height: u32, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Returns the buffer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the buffer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the raw pixel data.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the buffer, returning the raw pixel data.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> T {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<T> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: T) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = value;
    }

    /// Fills every pixel inside `region` (clipped to the buffer) with `value`.
    pub fn fill_rect(&mut self, region: Rect, value: T) {
        let Some(clipped) = region.intersect(&Rect::from_size(self.width, self.height)) else {
            return;
        };
        for y in clipped.y..clipped.y + clipped.height {
            let start = y as usize * self.width as usize + clipped.x as usize;
            self.data[start..start + clipped.width as usize].fill(value);
        }
    }

    /// Fills the whole buffer with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Returns the pixels of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[T] {
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }
}

/// Pixel data of any supported format.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    /// 8-bit RGBA.
    Rgba8(Buffer<Color>),
    /// Unsigned 8-bit gray.
    Gray8(Buffer<u8>),
    /// Signed 8-bit gray.
    Gray8s(Buffer<i8>),
    /// Unsigned 16-bit gray.
    Gray16(Buffer<u16>),
    /// Signed 16-bit gray.
    Gray16s(Buffer<i16>),
    /// Unsigned 32-bit gray.
    Gray32(Buffer<u32>),
    /// Signed 32-bit gray.
    Gray32s(Buffer<i32>),
    /// 32-bit float gray.
    Gray32f(Buffer<f32>),
    /// Unsigned 64-bit gray.
    Gray64(Buffer<u64>),
    /// Signed 64-bit gray.
    Gray64s(Buffer<i64>),
    /// 64-bit float gray.
    Gray64f(Buffer<f64>),
}

macro_rules! image_data_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Buffer<$t>> for ImageData {
                fn from(buffer: Buffer<$t>) -> Self {
                    ImageData::$variant(buffer)
                }
            }
        )*
    };
}

image_data_from! {
    Color => Rgba8,
    u8 => Gray8,
    i8 => Gray8s,
    u16 => Gray16,
    i16 => Gray16s,
    u32 => Gray32,
    i32 => Gray32s,
    f32 => Gray32f,
    u64 => Gray64,
    i64 => Gray64s,
    f64 => Gray64f,
}

/// Applies `$body` to the typed buffer inside an [`ImageData`].
macro_rules! with_buffer {
    ($data:expr, $buf:ident => $body:expr) => {
        match $data {
            ImageData::Rgba8($buf) => $body,
            ImageData::Gray8($buf) => $body,
            ImageData::Gray8s($buf) => $body,
            ImageData::Gray16($buf) => $body,
            ImageData::Gray16s($buf) => $body,
            ImageData::Gray32($buf) => $body,
            ImageData::Gray32s($buf) => $body,
            ImageData::Gray32f($buf) => $body,
            ImageData::Gray64($buf) => $body,
            ImageData::Gray64s($buf) => $body,
            ImageData::Gray64f($buf) => $body,
        }
    };
}

impl ImageData {
    /// Creates zero-filled data of the given format.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        match format {
            PixelFormat::Rgba8 => Buffer::<Color>::new(width, height).into(),
            PixelFormat::Gray8 => Buffer::<u8>::new(width, height).into(),
            PixelFormat::Gray8s => Buffer::<i8>::new(width, height).into(),
            PixelFormat::Gray16 => Buffer::<u16>::new(width, height).into(),
            PixelFormat::Gray16s => Buffer::<i16>::new(width, height).into(),
            PixelFormat::Gray32 => Buffer::<u32>::new(width, height).into(),
            PixelFormat::Gray32s => Buffer::<i32>::new(width, height).into(),
            PixelFormat::Gray32f => Buffer::<f32>::new(width, height).into(),
            PixelFormat::Gray64 => Buffer::<u64>::new(width, height).into(),
            PixelFormat::Gray64s => Buffer::<i64>::new(width, height).into(),
            PixelFormat::Gray64f => Buffer::<f64>::new(width, height).into(),
        }
    }

    /// Returns the pixel format.
    pub fn format(&self) -> PixelFormat {
        fn format_of<T: Sample>(_: &Buffer<T>) -> PixelFormat {
            T::FORMAT
        }
        with_buffer!(self, buf => format_of(buf))
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> u32 {
        with_buffer!(self, buf => buf.width())
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> u32 {
        with_buffer!(self, buf => buf.height())
    }
}

#[derive(Debug)]
struct ImageInner {
    data: ImageData,
    premultiplied: bool,
}

/// Immutable, reference-counted image.
///
/// Cloning is cheap and shares the pixel storage. Views created with
/// [`Image::view`] hold a clone, so the storage outlives the last view.
#[derive(Debug, Clone)]
pub struct Image {
    inner: Arc<ImageInner>,
}

impl Image {
    /// Wraps pixel data with straight (non-premultiplied) alpha.
    pub fn new(data: ImageData) -> Self {
        Self::with_alpha(data, false)
    }

    /// Wraps pixel data, recording whether `rgba8` pixels carry
    /// premultiplied alpha.
    pub fn with_alpha(data: ImageData, premultiplied: bool) -> Self {
        Self {
            inner: Arc::new(ImageInner {
                data,
                premultiplied,
            }),
        }
    }

    /// Creates a zero-filled image of the given format.
    pub fn blank(width: u32, height: u32, format: PixelFormat) -> Self {
        Self::new(ImageData::new(width, height, format))
    }

    /// Creates an image where every pixel is `value`.
    pub fn filled<T: Sample>(width: u32, height: u32, value: T) -> Self
    where
        ImageData: From<Buffer<T>>,
    {
        Self::new(Buffer::filled(width, height, value).into())
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.data.width()
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.data.height()
    }

    /// Returns the pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.inner.data.format()
    }

    /// Returns true if `rgba8` pixels are stored premultiplied.
    #[inline]
    pub fn is_premultiplied(&self) -> bool {
        self.inner.premultiplied
    }

    /// Returns the pixel data.
    #[inline]
    pub fn data(&self) -> &ImageData {
        &self.inner.data
    }

    /// Returns a rectangle covering the entire image.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width(), self.height())
    }

    /// Creates a read-only view of the `w x h` region at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if `x + w > width` or `y + h > height`.
    pub fn view(&self, x: u32, y: u32, w: u32, h: u32) -> Result<ImageView> {
        ImageView::new(self, Rect::new(x, y, w, h))
    }

    /// Number of strong handles (images, views, tasks) sharing the storage.
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Creates a weak handle that does not keep the storage alive.
    pub fn downgrade(&self) -> WeakImage {
        WeakImage {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl<T: Sample> From<Buffer<T>> for Image
where
    ImageData: From<Buffer<T>>,
{
    fn from(buffer: Buffer<T>) -> Self {
        Image::new(buffer.into())
    }
}

/// Non-owning handle to an [`Image`].
#[derive(Debug, Clone)]
pub struct WeakImage {
    inner: Weak<ImageInner>,
}

impl WeakImage {
    /// Returns the image if its storage is still alive.
    pub fn upgrade(&self) -> Option<Image> {
        self.inner.upgrade().map(|inner| Image { inner })
    }

    /// Returns true once every strong handle has been dropped.
    pub fn is_released(&self) -> bool {
        self.inner.strong_count() == 0
    }
}
