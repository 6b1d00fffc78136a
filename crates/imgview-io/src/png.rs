//! PNG format support.
//!
//! # Encoding
//!
//! | View format | Output |
//! |-------------|--------|
//! | `rgba8` | 8-bit RGBA, or 8-bit indexed with `png8` / a palette |
//! | `gray8` | 8-bit grayscale |
//! | `gray16` | 16-bit grayscale |
//!
//! Indexed output without a palette builds an exact palette from the
//! view; views with more than 256 distinct colors need a palette.
//!
//! # Decoding
//!
//! Palette and low bit depth images are expanded. RGB, gray-alpha and
//! 16-bit color decode to `rgba8`; 8-bit gray to `gray8`; 16-bit gray to
//! `gray16`.

use crate::pixels::{rgba_bytes, rgba_pixels, samples};
use crate::{IoError, IoResult, Palette, PngOptions};
use imgview_core::{AnyView, Buffer, Color, Image};
use std::collections::HashMap;
use std::io::Cursor;
use tracing::trace;

fn encode_error(e: png::EncodingError) -> IoError {
    IoError::EncodeError(e.to_string())
}

fn decode_error(e: png::DecodingError) -> IoError {
    IoError::DecodeError(e.to_string())
}

fn compression(level: Option<u8>) -> png::Compression {
    match level {
        Some(0..=2) => png::Compression::Fast,
        Some(7..=9) => png::Compression::High,
        _ => png::Compression::default(),
    }
}

struct Indexed {
    plte: Vec<u8>,
    trns: Option<Vec<u8>>,
    indices: Vec<u8>,
}

/// Maps pixels to their nearest palette entries.
///
/// The lookup memo lives for this call only.
fn quantize(pixels: &[Color], palette: &Palette) -> Indexed {
    let mut memo: HashMap<Color, u8> = HashMap::new();
    let indices = pixels
        .iter()
        .map(|&c| *memo.entry(c).or_insert_with(|| palette.nearest(c)))
        .collect();
    trace!(pixels = pixels.len(), distinct = memo.len(), "pixels quantized");
    Indexed {
        plte: palette.rgb_table(),
        trns: palette.alpha_table(),
        indices,
    }
}

/// Builds a lossless palette in first-seen order.
fn exact_palette(pixels: &[Color]) -> IoResult<Indexed> {
    let mut lookup: HashMap<Color, u8> = HashMap::new();
    let mut entries: Vec<Color> = Vec::new();
    let mut indices = Vec::with_capacity(pixels.len());
    for &px in pixels {
        let idx = match lookup.get(&px) {
            Some(&idx) => idx,
            None => {
                if entries.len() == crate::palette::MAX_COLORS {
                    return Err(IoError::EncodeError(
                        "view has more than 256 colors; png8 needs a palette".into(),
                    ));
                }
                let idx = entries.len() as u8;
                entries.push(px);
                lookup.insert(px, idx);
                idx
            }
        };
        indices.push(idx);
    }
    // a zero-area view still needs one PLTE entry
    if entries.is_empty() {
        entries.push(Color::transparent());
    }
    let palette = Palette::new(entries)?;
    Ok(Indexed {
        plte: palette.rgb_table(),
        trns: palette.alpha_table(),
        indices,
    })
}

fn write_png(
    width: u32,
    height: u32,
    color: png::ColorType,
    depth: png::BitDepth,
    data: &[u8],
    options: &PngOptions,
    palette: Option<(Vec<u8>, Option<Vec<u8>>)>,
) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        encoder.set_compression(compression(options.compression));
        if let Some((plte, trns)) = palette {
            encoder.set_palette(plte);
            if let Some(trns) = trns {
                encoder.set_trns(trns);
            }
        }
        let mut writer = encoder.write_header().map_err(encode_error)?;
        writer.write_image_data(data).map_err(encode_error)?;
        writer.finish().map_err(encode_error)?;
    }
    trace!(width, height, ?color, bytes = out.len(), "png encoded");
    Ok(out)
}

/// Encodes a view as PNG.
///
/// A palette forces indexed output.
pub fn encode(
    view: &AnyView<'_>,
    options: &PngOptions,
    palette: Option<&Palette>,
    premultiplied: bool,
) -> IoResult<Vec<u8>> {
    let (width, height) = (view.width(), view.height());
    let indexed = options.indexed || palette.is_some();

    match view {
        AnyView::Rgba8(v) if indexed => {
            let pixels = rgba_pixels(v, premultiplied);
            let table = match palette {
                Some(palette) => quantize(&pixels, palette),
                None => exact_palette(&pixels)?,
            };
            write_png(
                width,
                height,
                png::ColorType::Indexed,
                png::BitDepth::Eight,
                &table.indices,
                options,
                Some((table.plte, table.trns)),
            )
        }
        AnyView::Rgba8(v) => write_png(
            width,
            height,
            png::ColorType::Rgba,
            png::BitDepth::Eight,
            &rgba_bytes(v, premultiplied),
            options,
            None,
        ),
        AnyView::Gray8(v) if !indexed => write_png(
            width,
            height,
            png::ColorType::Grayscale,
            png::BitDepth::Eight,
            &samples(v),
            options,
            None,
        ),
        AnyView::Gray16(v) if !indexed => {
            let bytes: Vec<u8> = samples(v).into_iter().flat_map(u16::to_be_bytes).collect();
            write_png(
                width,
                height,
                png::ColorType::Grayscale,
                png::BitDepth::Sixteen,
                &bytes,
                options,
                None,
            )
        }
        other => Err(IoError::UnsupportedPixelFormat {
            codec: if indexed { "png8" } else { "png" },
            format: other.format(),
        }),
    }
}

/// Decodes PNG bytes into an image.
pub fn decode(bytes: &[u8]) -> IoResult<Image> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info().map_err(decode_error)?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader.next_frame(&mut buf).map_err(decode_error)?;
    let data = &buf[..info.buffer_size()];
    let (width, height) = (info.width, info.height);

    let image = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => {
            let px = data.chunks_exact(4).map(|c| Color::new(c[0], c[1], c[2], c[3]));
            Image::from(Buffer::from_vec(width, height, px.collect())?)
        }
        (png::ColorType::Rgb, png::BitDepth::Eight) => {
            let px = data.chunks_exact(3).map(|c| Color::rgb(c[0], c[1], c[2]));
            Image::from(Buffer::from_vec(width, height, px.collect())?)
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => {
            let px = data.chunks_exact(2).map(|c| Color::new(c[0], c[0], c[0], c[1]));
            Image::from(Buffer::from_vec(width, height, px.collect())?)
        }
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            Image::from(Buffer::from_vec(width, height, data.to_vec())?)
        }
        (png::ColorType::Grayscale, png::BitDepth::Sixteen) => {
            let px = data.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]]));
            Image::from(Buffer::from_vec(width, height, px.collect())?)
        }
        // 16-bit color keeps the high byte
        (png::ColorType::Rgba, png::BitDepth::Sixteen) => {
            let px = data.chunks_exact(8).map(|c| Color::new(c[0], c[2], c[4], c[6]));
            Image::from(Buffer::from_vec(width, height, px.collect())?)
        }
        (png::ColorType::Rgb, png::BitDepth::Sixteen) => {
            let px = data.chunks_exact(6).map(|c| Color::rgb(c[0], c[2], c[4]));
            Image::from(Buffer::from_vec(width, height, px.collect())?)
        }
        (color_type, bit_depth) => {
            return Err(IoError::DecodeError(format!(
                "unsupported PNG layout: {color_type:?} {bit_depth:?}"
            )));
        }
    };
    trace!(width, height, format = %image.format(), "png decoded");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgview_core::{PixelFormat, PixelValue};

    fn gradient_rgba(width: u32, height: u32) -> Image {
        let mut buf = Buffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buf.set_pixel(x, y, Color::new((x * 8) as u8, (y * 8) as u8, 128, 200));
            }
        }
        Image::from(buf)
    }

    #[test]
    fn test_roundtrip_rgba() {
        let image = gradient_rgba(32, 16);
        let view = image.view(4, 2, 20, 10).unwrap();
        let bytes = encode(&view.view(), &PngOptions::default(), None, false).unwrap();
        let loaded = decode(&bytes).unwrap();
        assert_eq!(loaded.format(), PixelFormat::Rgba8);
        assert_eq!((loaded.width(), loaded.height()), (20, 10));
        let back = loaded.view(0, 0, 20, 10).unwrap();
        for y in 0..10 {
            for x in 0..20 {
                assert_eq!(back.get_pixel(x, y), view.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_roundtrip_gray16() {
        let mut buf: Buffer<u16> = Buffer::new(5, 4);
        buf.set_pixel(4, 3, 60_000);
        buf.set_pixel(0, 0, 257);
        let image = Image::from(buf);
        let view = image.view(0, 0, 5, 4).unwrap();
        let bytes = encode(&view.view(), &PngOptions::default(), None, false).unwrap();
        let loaded = decode(&bytes).unwrap();
        assert_eq!(loaded.format(), PixelFormat::Gray16);
        let back = loaded.view(0, 0, 5, 4).unwrap();
        assert_eq!(back.get_pixel(4, 3), Some(PixelValue::Packed(60_000)));
        assert_eq!(back.get_pixel(0, 0), Some(PixelValue::Packed(257)));
    }

    #[test]
    fn test_exact_palette() {
        let mut buf = Buffer::filled(8, 8, Color::rgb(255, 0, 0));
        buf.set_pixel(3, 3, Color::new(0, 0, 255, 100));
        let image = Image::from(buf);
        let view = image.view(0, 0, 8, 8).unwrap();
        let opts = PngOptions {
            indexed: true,
            compression: Some(9),
        };
        let bytes = encode(&view.view(), &opts, None, false).unwrap();
        let loaded = decode(&bytes).unwrap();
        let back = loaded.view(0, 0, 8, 8).unwrap();
        assert_eq!(
            back.get_pixel(3, 3),
            Some(PixelValue::Color(Color::new(0, 0, 255, 100)))
        );
        assert_eq!(back.get_pixel(0, 0), Some(PixelValue::Color(Color::rgb(255, 0, 0))));
    }

    #[test]
    fn test_exact_palette_overflow() {
        let image = gradient_rgba(32, 32);
        let view = image.view(0, 0, 32, 32).unwrap();
        let opts = PngOptions {
            indexed: true,
            compression: None,
        };
        let err = encode(&view.view(), &opts, None, false).unwrap_err();
        assert!(matches!(err, IoError::EncodeError(_)));
    }

    #[test]
    fn test_palette_quantizes() {
        let image = gradient_rgba(32, 32);
        let view = image.view(0, 0, 32, 32).unwrap();
        let palette = Palette::from_rgb_bytes(&[0, 0, 0, 255, 255, 255]).unwrap();
        let bytes = encode(&view.view(), &PngOptions::default(), Some(&palette), false).unwrap();
        let loaded = decode(&bytes).unwrap();
        let back = loaded.view(0, 0, 32, 32).unwrap();
        for (x, y) in [(0, 0), (31, 31), (10, 20)] {
            let c = back.get_pixel(x, y).and_then(|v| v.as_color()).unwrap();
            assert!(c == Color::rgb(0, 0, 0) || c == Color::rgb(255, 255, 255));
        }
    }

    #[test]
    fn test_unsupported_formats() {
        let image = Image::filled(2, 2, 1.0f32);
        let view = image.view(0, 0, 2, 2).unwrap();
        let err = encode(&view.view(), &PngOptions::default(), None, false).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedPixelFormat { codec: "png", .. }));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode(b"not a png"), Err(IoError::DecodeError(_))));
    }
}
