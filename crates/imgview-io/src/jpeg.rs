//! JPEG format support.
//!
//! `rgba8` views are written as RGB with the alpha channel dropped;
//! `gray8` views as single-channel luma. Decoding yields `rgba8` for color
//! and CMYK input, `gray8` / `gray16` for luma.

use crate::pixels::{rgba_bytes, samples};
use crate::{IoError, IoResult, JpegOptions};
use imgview_core::{AnyView, Buffer, Color, Image};
use std::io::Cursor;
use tracing::trace;

fn dimension(value: u32, name: &str) -> IoResult<u16> {
    u16::try_from(value)
        .map_err(|_| IoError::EncodeError(format!("JPEG {name} {value} exceeds 65535")))
}

/// Encodes a view as JPEG.
pub fn encode(view: &AnyView<'_>, options: &JpegOptions, premultiplied: bool) -> IoResult<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    let width = dimension(view.width(), "width")?;
    let height = dimension(view.height(), "height")?;

    let (color_type, data) = match view {
        // alpha is ignored by the encoder
        AnyView::Rgba8(v) => (ColorType::Rgba, rgba_bytes(v, premultiplied)),
        AnyView::Gray8(v) => (ColorType::Luma, samples(v)),
        other => {
            return Err(IoError::UnsupportedPixelFormat {
                codec: "jpeg",
                format: other.format(),
            });
        }
    };

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, options.quality);
    encoder
        .encode(&data, width, height, color_type)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

    trace!(width, height, quality = options.quality, bytes = buffer.len(), "jpeg encoded");
    Ok(buffer)
}

/// Decodes JPEG bytes into an image.
pub fn decode(bytes: &[u8]) -> IoResult<Image> {
    let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(bytes));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;
    let (width, height) = (info.width as u32, info.height as u32);

    let image = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => {
            let px = pixels.chunks_exact(3).map(|c| Color::rgb(c[0], c[1], c[2]));
            Image::from(Buffer::from_vec(width, height, px.collect())?)
        }
        jpeg_decoder::PixelFormat::L8 => Image::from(Buffer::from_vec(width, height, pixels)?),
        jpeg_decoder::PixelFormat::L16 => {
            let px = pixels.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]]));
            Image::from(Buffer::from_vec(width, height, px.collect())?)
        }
        jpeg_decoder::PixelFormat::CMYK32 => {
            let px = pixels.chunks_exact(4).map(|cmyk| {
                let k = 255 - cmyk[3] as u32;
                let ch = |v: u8| ((255 - v as u32) * k / 255) as u8;
                Color::rgb(ch(cmyk[0]), ch(cmyk[1]), ch(cmyk[2]))
            });
            Image::from(Buffer::from_vec(width, height, px.collect())?)
        }
    };
    trace!(width, height, format = %image.format(), "jpeg decoded");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgview_core::PixelFormat;

    #[test]
    fn test_roundtrip_dimensions() {
        let image = Image::filled(40, 30, Color::new(100, 150, 200, 10));
        let view = image.view(5, 5, 32, 16).unwrap();
        let bytes = encode(&view.view(), &JpegOptions::default(), false).unwrap();
        let loaded = decode(&bytes).unwrap();
        assert_eq!(loaded.format(), PixelFormat::Rgba8);
        assert_eq!((loaded.width(), loaded.height()), (32, 16));
        let c = loaded.view(0, 0, 1, 1).unwrap().get_pixel(0, 0).unwrap().as_color().unwrap();
        // lossy, but a flat color survives closely; alpha is dropped
        assert!((c.r as i32 - 100).abs() <= 3);
        assert!((c.b as i32 - 200).abs() <= 3);
        assert_eq!(c.a, 255);
    }

    #[test]
    fn test_gray_roundtrip() {
        let image = Image::filled(16, 16, 77u8);
        let view = image.view(0, 0, 16, 16).unwrap();
        let bytes = encode(&view.view(), &JpegOptions { quality: 95 }, false).unwrap();
        let loaded = decode(&bytes).unwrap();
        assert_eq!(loaded.format(), PixelFormat::Gray8);
    }

    #[test]
    fn test_quality_affects_size() {
        let mut buf = Buffer::new(64, 64);
        for y in 0..64 {
            for x in 0..64 {
                buf.set_pixel(x, y, Color::rgb((x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8));
            }
        }
        let image = Image::from(buf);
        let view = image.view(0, 0, 64, 64).unwrap();
        let low = encode(&view.view(), &JpegOptions { quality: 20 }, false).unwrap();
        let high = encode(&view.view(), &JpegOptions { quality: 98 }, false).unwrap();
        assert!(high.len() > low.len());
    }

    #[test]
    fn test_unsupported() {
        let image = Image::filled(4, 4, 5u16);
        let view = image.view(0, 0, 4, 4).unwrap();
        assert!(matches!(
            encode(&view.view(), &JpegOptions::default(), false),
            Err(IoError::UnsupportedPixelFormat { codec: "jpeg", .. })
        ));
    }
}
