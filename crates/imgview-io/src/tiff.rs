//! TIFF format support.
//!
//! TIFF stores the widest range of view formats: `rgba8`, `gray8`,
//! `gray16`, `gray32`, `gray32f`, `gray64` and `gray64f` are written
//! losslessly and decode back to the same format.

use crate::pixels::{rgba_bytes, samples};
use crate::{IoError, IoResult, TiffCompression, TiffOptions};
use imgview_core::{AnyView, Buffer, Color, Image};
use std::io::Cursor;
use tiff::encoder::{TiffEncoder, colortype, compression};
use tracing::trace;

fn encode_error(e: tiff::TiffError) -> IoError {
    IoError::EncodeError(e.to_string())
}

fn decode_error(e: tiff::TiffError) -> IoError {
    IoError::DecodeError(e.to_string())
}

/// Writes one image with the requested compression.
macro_rules! write_image {
    ($encoder:expr, $color:ty, $width:expr, $height:expr, $data:expr, $compression:expr) => {
        match $compression {
            TiffCompression::None => $encoder.write_image::<$color>($width, $height, $data),
            TiffCompression::Lzw => $encoder.write_image_with_compression::<$color, compression::Lzw>(
                $width,
                $height,
                compression::Lzw,
                $data,
            ),
            TiffCompression::Deflate => $encoder
                .write_image_with_compression::<$color, compression::Deflate>(
                    $width,
                    $height,
                    compression::Deflate::default(),
                    $data,
                ),
            TiffCompression::PackBits => $encoder
                .write_image_with_compression::<$color, compression::Packbits>(
                    $width,
                    $height,
                    compression::Packbits,
                    $data,
                ),
        }
    };
}

/// Encodes a view as TIFF.
pub fn encode(view: &AnyView<'_>, options: &TiffOptions, premultiplied: bool) -> IoResult<Vec<u8>> {
    let (width, height) = (view.width(), view.height());
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).map_err(encode_error)?;
        let c = options.compression;
        let written = match view {
            AnyView::Rgba8(v) => {
                let data = rgba_bytes(v, premultiplied);
                write_image!(encoder, colortype::RGBA8, width, height, &data, c)
            }
            AnyView::Gray8(v) => {
                write_image!(encoder, colortype::Gray8, width, height, &samples(v), c)
            }
            AnyView::Gray16(v) => {
                write_image!(encoder, colortype::Gray16, width, height, &samples(v), c)
            }
            AnyView::Gray32(v) => {
                write_image!(encoder, colortype::Gray32, width, height, &samples(v), c)
            }
            AnyView::Gray32f(v) => {
                write_image!(encoder, colortype::Gray32Float, width, height, &samples(v), c)
            }
            AnyView::Gray64(v) => {
                write_image!(encoder, colortype::Gray64, width, height, &samples(v), c)
            }
            AnyView::Gray64f(v) => {
                write_image!(encoder, colortype::Gray64Float, width, height, &samples(v), c)
            }
            other => {
                return Err(IoError::UnsupportedPixelFormat {
                    codec: "tiff",
                    format: other.format(),
                });
            }
        };
        written.map_err(encode_error)?;
    }
    let out = cursor.into_inner();
    trace!(width, height, compression = ?options.compression, bytes = out.len(), "tiff encoded");
    Ok(out)
}

/// Decodes TIFF bytes into an image.
pub fn decode(bytes: &[u8]) -> IoResult<Image> {
    use tiff::ColorType;
    use tiff::decoder::{Decoder, DecodingResult};

    let mut decoder = Decoder::new(Cursor::new(bytes)).map_err(decode_error)?;
    let (width, height) = decoder.dimensions().map_err(decode_error)?;
    let color_type = decoder.colortype().map_err(decode_error)?;
    let result = decoder.read_image().map_err(decode_error)?;

    let image = match (color_type, result) {
        (ColorType::RGBA(8), DecodingResult::U8(buf)) => {
            let px = buf.chunks_exact(4).map(|c| Color::new(c[0], c[1], c[2], c[3]));
            Image::from(Buffer::from_vec(width, height, px.collect())?)
        }
        (ColorType::RGB(8), DecodingResult::U8(buf)) => {
            let px = buf.chunks_exact(3).map(|c| Color::rgb(c[0], c[1], c[2]));
            Image::from(Buffer::from_vec(width, height, px.collect())?)
        }
        (ColorType::Gray(8), DecodingResult::U8(buf)) => Image::from(Buffer::from_vec(width, height, buf)?),
        (ColorType::Gray(16), DecodingResult::U16(buf)) => Image::from(Buffer::from_vec(width, height, buf)?),
        (ColorType::Gray(32), DecodingResult::U32(buf)) => Image::from(Buffer::from_vec(width, height, buf)?),
        (ColorType::Gray(32), DecodingResult::F32(buf)) => Image::from(Buffer::from_vec(width, height, buf)?),
        (ColorType::Gray(64), DecodingResult::U64(buf)) => Image::from(Buffer::from_vec(width, height, buf)?),
        (ColorType::Gray(64), DecodingResult::F64(buf)) => Image::from(Buffer::from_vec(width, height, buf)?),
        (ct, _) => {
            return Err(IoError::DecodeError(format!("unsupported TIFF color type: {ct:?}")));
        }
    };
    trace!(width, height, format = %image.format(), "tiff decoded");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use imgview_core::{PixelFormat, PixelValue};

    #[test]
    fn test_roundtrip_float() {
        let mut buf: Buffer<f32> = Buffer::new(6, 4);
        buf.set_pixel(2, 3, 0.125);
        buf.set_pixel(5, 0, -4.5);
        let image = Image::from(buf);
        let view = image.view(0, 0, 6, 4).unwrap();
        let bytes = encode(&view.view(), &TiffOptions::default(), false).unwrap();
        let loaded = decode(&bytes).unwrap();
        assert_eq!(loaded.format(), PixelFormat::Gray32f);
        let back = loaded.view(0, 0, 6, 4).unwrap();
        assert_relative_eq!(back.get_pixel(2, 3).unwrap().as_f64().unwrap(), 0.125);
        assert_relative_eq!(back.get_pixel(5, 0).unwrap().as_f64().unwrap(), -4.5);
    }

    #[test]
    fn test_roundtrip_rgba_lzw() {
        let mut buf = Buffer::filled(9, 7, Color::new(1, 2, 3, 4));
        buf.set_pixel(8, 6, Color::rgb(200, 100, 50));
        let image = Image::from(buf);
        let view = image.view(1, 1, 8, 6).unwrap();
        let opts = TiffOptions {
            compression: TiffCompression::Lzw,
        };
        let loaded = decode(&encode(&view.view(), &opts, false).unwrap()).unwrap();
        let back = loaded.view(0, 0, 8, 6).unwrap();
        assert_eq!(back.get_pixel(7, 5), Some(PixelValue::Color(Color::rgb(200, 100, 50))));
        assert_eq!(back.get_pixel(0, 0), Some(PixelValue::Color(Color::new(1, 2, 3, 4))));
    }

    #[test]
    fn test_roundtrip_gray64() {
        let image = Image::filled(3, 3, 5_000_000_000u64);
        let view = image.view(0, 0, 3, 3).unwrap();
        let loaded = decode(&encode(&view.view(), &TiffOptions::default(), false).unwrap()).unwrap();
        assert_eq!(loaded.format(), PixelFormat::Gray64);
        assert!(loaded.view(0, 0, 3, 3).unwrap().is_solid());
    }

    #[test]
    fn test_signed_unsupported() {
        let image = Image::filled(2, 2, -1i32);
        let view = image.view(0, 0, 2, 2).unwrap();
        assert!(matches!(
            encode(&view.view(), &TiffOptions::default(), false),
            Err(IoError::UnsupportedPixelFormat { codec: "tiff", .. })
        ));
    }
}
