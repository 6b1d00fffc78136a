//! Encoding views end to end through bytes and files.

use imgview_core::{Buffer, Color, Image, ImageData, PixelFormat, PixelValue};
use imgview_io::{Format, IoError, Palette, decode, encode_to_bytes, encode_to_file, read};
use tempfile::TempDir;

fn pattern() -> Image {
    let mut buf = Buffer::new(24, 18);
    for y in 0..18 {
        for x in 0..24 {
            buf.set_pixel(x, y, Color::new((x * 10) as u8, (y * 14) as u8, 99, 255 - x as u8));
        }
    }
    Image::from(buf)
}

fn assert_same_pixels(a: &imgview_core::ImageView, b: &imgview_core::ImageView) {
    assert_eq!((a.width(), a.height()), (b.width(), b.height()));
    for y in 0..a.height() as i64 {
        for x in 0..a.width() as i64 {
            assert_eq!(a.get_pixel(x, y), b.get_pixel(x, y), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn png_roundtrip_reproduces_view() {
    let image = pattern();
    let view = image.view(3, 4, 15, 9).unwrap();
    let bytes = encode_to_bytes(&view, "png", None).unwrap();
    assert_eq!(Format::from_bytes(&bytes), Format::Png);

    let decoded = decode(&bytes).unwrap();
    let full = decoded.view(0, 0, decoded.width(), decoded.height()).unwrap();
    assert_same_pixels(&view, &full);
}

#[test]
fn gray8_png_and_tiff_roundtrip() {
    let mut buf: Buffer<u8> = Buffer::new(10, 10);
    buf.fill_rect(imgview_core::Rect::new(2, 2, 5, 5), 200);
    let image = Image::from(buf);
    let view = image.view(1, 1, 8, 8).unwrap();
    for format in ["png", "tiff:compression=deflate"] {
        let decoded = decode(&encode_to_bytes(&view, format, None).unwrap()).unwrap();
        assert_eq!(decoded.format(), PixelFormat::Gray8, "{format}");
        assert_same_pixels(&view, &decoded.view(0, 0, 8, 8).unwrap());
    }
}

#[test]
fn premultiplied_views_are_demultiplied() {
    let straight = Color::new(200, 100, 50, 128);
    let image = Image::with_alpha(
        ImageData::from(Buffer::filled(2, 2, straight.premultiply())),
        true,
    );
    let view = image.view(0, 0, 2, 2).unwrap();
    let decoded = decode(&encode_to_bytes(&view, "png", None).unwrap()).unwrap();
    let c = decoded.view(0, 0, 1, 1).unwrap().get_pixel(0, 0).unwrap().as_color().unwrap();
    assert_eq!(c.a, 128);
    assert!((c.r as i32 - 200).abs() <= 2);
    assert!((c.g as i32 - 100).abs() <= 2);
}

#[test]
fn bad_format_strings() {
    let image = pattern();
    let view = image.view(0, 0, 4, 4).unwrap();
    assert!(matches!(
        encode_to_bytes(&view, "gif", None),
        Err(IoError::UnknownFormat(_))
    ));
    assert!(matches!(
        encode_to_bytes(&view, "png:z=42", None),
        Err(IoError::InvalidOption(_))
    ));
}

#[test]
fn palette_yields_indexed_png() {
    let image = pattern();
    let view = image.view(0, 0, 24, 18).unwrap();
    let palette = Palette::new(vec![Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]).unwrap();
    let indexed = encode_to_bytes(&view, "png", Some(&palette)).unwrap();
    let full = encode_to_bytes(&view, "png", None).unwrap();
    assert!(indexed.len() < full.len());
}

#[test]
fn save_unknown_extension_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.xyz");
    let image = pattern();
    let view = image.view(0, 0, 4, 4).unwrap();

    let err = encode_to_file(&view, &path, None).unwrap_err();
    assert!(matches!(err, IoError::UnknownFormat(_)));
    assert!(err.to_string().contains("out.xyz"));
    assert!(!path.exists());
}

#[test]
fn save_infers_format_from_extension() {
    let dir = TempDir::new().unwrap();
    let image = pattern();
    let view = image.view(5, 5, 10, 10).unwrap();

    for (name, expected) in [("a.png", Format::Png), ("b.JPG", Format::Jpeg), ("c.tiff", Format::Tiff)] {
        let path = dir.path().join(name);
        encode_to_file(&view, &path, None).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(Format::from_bytes(&bytes), expected, "{name}");
        let loaded = read(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (10, 10));
    }
}

#[test]
fn explicit_format_overrides_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tile.png");
    let image = pattern();
    let view = image.view(0, 0, 8, 8).unwrap();
    encode_to_file(&view, &path, Some("tiff")).unwrap();
    assert_eq!(Format::from_bytes(&std::fs::read(&path).unwrap()), Format::Tiff);
}

#[test]
fn encode_failure_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("signed.png");
    let image = Image::filled(3, 3, -2i16);
    let view = image.view(0, 0, 3, 3).unwrap();
    let err = encode_to_file(&view, &path, None).unwrap_err();
    assert!(matches!(err, IoError::UnsupportedPixelFormat { .. }));
    assert!(!path.exists());
}

#[test]
fn decoded_solid_tile_stays_solid() {
    let red = Color::rgb(255, 0, 0);
    let image = Image::filled(10, 10, red);
    let view = image.view(0, 0, 10, 10).unwrap();
    let decoded = decode(&encode_to_bytes(&view, "png8", None).unwrap()).unwrap();
    let back = decoded.view(0, 0, 10, 10).unwrap();
    assert!(back.is_solid());
    assert_eq!(back.get_pixel(9, 9), Some(PixelValue::Color(red)));
}

#[test]
fn shared_palette_encodes_are_independent() {
    let image = pattern();
    let left = image.view(0, 0, 12, 18).unwrap();
    let right = image.view(12, 0, 12, 18).unwrap();
    let palette = std::sync::Arc::new(
        Palette::from_rgb_bytes(&[0, 0, 0, 255, 255, 255, 200, 0, 99, 0, 250, 99]).unwrap(),
    );

    let first = encode_to_bytes(&left, "png8", Some(&palette)).unwrap();
    let (from_thread, concurrent) = std::thread::scope(|s| {
        let a = s.spawn(|| encode_to_bytes(&right, "png8", Some(&palette)).unwrap());
        let b = encode_to_bytes(&left, "png8", Some(&palette)).unwrap();
        (a.join().unwrap(), b)
    });

    // re-encoding after other work on the same palette gives identical output
    assert_eq!(first, concurrent);
    let fresh = Palette::clone(&palette);
    assert_eq!(encode_to_bytes(&right, "png8", Some(&fresh)).unwrap(), from_thread);

    for (view, bytes) in [(&left, &first), (&right, &from_thread)] {
        let decoded = decode(bytes).unwrap();
        let back = decoded.view(0, 0, view.width(), view.height()).unwrap();
        for y in 0..view.height() as i64 {
            for x in 0..view.width() as i64 {
                let source = view.get_pixel(x, y).and_then(|p| p.as_color()).unwrap();
                let expected = palette.colors()[palette.nearest(source) as usize];
                assert_eq!(back.get_pixel(x, y), Some(PixelValue::Color(expected)));
            }
        }
    }
}
