//! Encoding views to memory and to files.
//!
//! Both entry points encode the whole view in memory first. A file is only
//! created once encoding has succeeded, so failures never leave partial
//! output behind.

use crate::{EncodeOptions, Format, IoError, IoResult, Palette};
use imgview_core::{ImageView, PixelFormat};
use std::path::Path;
use tracing::{debug, trace};

/// Encodes a view with already-parsed options.
///
/// The palette only affects PNG output, where it switches to indexed color.
pub fn encode(view: &ImageView, options: &EncodeOptions, palette: Option<&Palette>) -> IoResult<Vec<u8>> {
    let any = view.view();
    let premultiplied = view.image().is_premultiplied();
    trace!(
        region = %view.region(),
        format = %view.format(),
        options = %options,
        palette = palette.map(Palette::len),
        "encoding view"
    );

    if palette.is_some() && !matches!(options, EncodeOptions::Png(_)) {
        debug!(options = %options, "palette ignored for non-PNG output");
    }
    if view.format() == PixelFormat::Rgba8 && !options.format().supports_alpha() {
        debug!(options = %options, "alpha channel dropped");
    }

    match options {
        #[cfg(feature = "png")]
        EncodeOptions::Png(png) => crate::png::encode(&any, png, palette, premultiplied),

        #[cfg(feature = "jpeg")]
        EncodeOptions::Jpeg(jpeg) => crate::jpeg::encode(&any, jpeg, premultiplied),

        #[cfg(feature = "tiff")]
        EncodeOptions::Tiff(tiff) => crate::tiff::encode(&any, tiff, premultiplied),

        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(other.format().extension().to_string())),
    }
}

/// Encodes a view to bytes using a format string such as `"png"`,
/// `"png8:z=9"` or `"jpeg80"`.
///
/// # Errors
///
/// - [`IoError::UnknownFormat`] / [`IoError::InvalidOption`] for a bad
///   format string
/// - [`IoError::UnsupportedPixelFormat`] if the codec cannot store the view
/// - [`IoError::EncodeError`] on codec failure
pub fn encode_to_bytes(view: &ImageView, format: &str, palette: Option<&Palette>) -> IoResult<Vec<u8>> {
    let options = EncodeOptions::parse(format)?;
    encode(view, &options, palette)
}

/// Resolves the options for a file write: the explicit format string when
/// given, otherwise the path's extension.
pub fn file_options(path: &Path, format: Option<&str>) -> IoResult<EncodeOptions> {
    match format {
        Some(format) => EncodeOptions::parse(format),
        None => match Format::from_extension(path) {
            Format::Unknown => Err(IoError::UnknownFormat(format!(
                "unknown output extension for: {}",
                path.display()
            ))),
            known => EncodeOptions::for_format(known),
        },
    }
}

/// Encodes a view and writes it to `path`.
///
/// The format is resolved before any encoding work starts; an unknown
/// extension fails with [`IoError::UnknownFormat`] and touches no file.
pub fn encode_to_file<P: AsRef<Path>>(view: &ImageView, path: P, format: Option<&str>) -> IoResult<()> {
    let path = path.as_ref();
    let options = file_options(path, format)?;
    let bytes = encode(view, &options, None)?;
    std::fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), options = %options, "view saved");
    Ok(())
}
