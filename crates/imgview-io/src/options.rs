//! Encoder options parsed from format strings.
//!
//! A format string is a codec name optionally followed by `:key=value`
//! pairs, for example `png8:z=9`, `jpeg85` or `tiff:compression=lzw`.
//!
//! | Name | Codec | Keys |
//! |------|-------|------|
//! | `png`, `png32`, `png24` | PNG, full color | `z=0..9` |
//! | `png8`, `png256` | PNG, indexed | `z=0..9` |
//! | `jpeg`, `jpg`, `jpegNN` | JPEG | `quality=1..100` |
//! | `tiff`, `tif` | TIFF | `compression=none\|lzw\|deflate\|packbits` |
//!
//! ```rust
//! use imgview_io::{EncodeOptions, Format};
//!
//! let opts: EncodeOptions = "jpeg85".parse().unwrap();
//! assert_eq!(opts.format(), Format::Jpeg);
//! assert!("webp".parse::<EncodeOptions>().is_err());
//! ```

use crate::{Format, IoError, IoResult};
use std::fmt;
use std::str::FromStr;

/// Options for writing PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PngOptions {
    /// Write 8-bit indexed color instead of full RGBA.
    pub indexed: bool,
    /// zlib level 0-9; `None` uses the codec default.
    pub compression: Option<u8>,
}

/// Options for writing JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegOptions {
    /// Quality level 1-100. Default: 85.
    pub quality: u8,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self { quality: 85 }
    }
}

/// TIFF compression method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression.
    #[default]
    None,
    /// LZW compression.
    Lzw,
    /// ZIP/Deflate compression.
    Deflate,
    /// PackBits run-length compression.
    PackBits,
}

/// Options for writing TIFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TiffOptions {
    /// Compression method.
    pub compression: TiffCompression,
}

/// Codec selection plus its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOptions {
    /// PNG output.
    Png(PngOptions),
    /// JPEG output.
    Jpeg(JpegOptions),
    /// TIFF output.
    Tiff(TiffOptions),
}

impl EncodeOptions {
    /// Default options for an encoded format.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownFormat`] for [`Format::Unknown`].
    pub fn for_format(format: Format) -> IoResult<Self> {
        match format {
            Format::Png => Ok(EncodeOptions::Png(PngOptions::default())),
            Format::Jpeg => Ok(EncodeOptions::Jpeg(JpegOptions::default())),
            Format::Tiff => Ok(EncodeOptions::Tiff(TiffOptions::default())),
            Format::Unknown => Err(IoError::UnknownFormat("unknown".into())),
        }
    }

    /// The encoded format these options produce.
    pub fn format(&self) -> Format {
        match self {
            EncodeOptions::Png(_) => Format::Png,
            EncodeOptions::Jpeg(_) => Format::Jpeg,
            EncodeOptions::Tiff(_) => Format::Tiff,
        }
    }

    /// Parses a format string such as `png8:z=9` or `jpeg70`.
    pub fn parse(spec: &str) -> IoResult<Self> {
        let mut parts = spec.trim().split(':');
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();

        let mut opts = match name.as_str() {
            "png" | "png32" | "png24" => EncodeOptions::Png(PngOptions::default()),
            "png8" | "png256" => EncodeOptions::Png(PngOptions {
                indexed: true,
                compression: None,
            }),
            "tiff" | "tif" => EncodeOptions::Tiff(TiffOptions::default()),
            "jpeg" | "jpg" => EncodeOptions::Jpeg(JpegOptions::default()),
            other => match jpeg_quality_suffix(other) {
                Some(quality) => EncodeOptions::Jpeg(JpegOptions {
                    quality: parse_quality(quality)?,
                }),
                None => return Err(IoError::UnknownFormat(spec.to_string())),
            },
        };

        for part in parts.filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| IoError::InvalidOption(format!("expected key=value, got '{part}'")))?;
            opts.apply(key.trim(), value.trim())?;
        }
        Ok(opts)
    }

    fn apply(&mut self, key: &str, value: &str) -> IoResult<()> {
        match (self, key) {
            (EncodeOptions::Png(png), "z") => {
                let level: u8 = value
                    .parse()
                    .ok()
                    .filter(|level| *level <= 9)
                    .ok_or_else(|| IoError::InvalidOption(format!("z must be 0-9, got '{value}'")))?;
                png.compression = Some(level);
            }
            (EncodeOptions::Jpeg(jpeg), "quality") => jpeg.quality = parse_quality(value)?,
            (EncodeOptions::Tiff(tiff), "compression") => {
                tiff.compression = match value.to_ascii_lowercase().as_str() {
                    "none" => TiffCompression::None,
                    "lzw" => TiffCompression::Lzw,
                    "deflate" | "zip" => TiffCompression::Deflate,
                    "packbits" => TiffCompression::PackBits,
                    other => {
                        return Err(IoError::InvalidOption(format!(
                            "unknown tiff compression '{other}'"
                        )));
                    }
                };
            }
            (opts, key) => {
                return Err(IoError::InvalidOption(format!(
                    "unknown {} option '{key}'",
                    opts.format().extension()
                )));
            }
        }
        Ok(())
    }
}

/// `jpeg85` / `jpg85` -> `Some("85")`.
fn jpeg_quality_suffix(name: &str) -> Option<&str> {
    let digits = name
        .strip_prefix("jpeg")
        .or_else(|| name.strip_prefix("jpg"))?;
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

fn parse_quality(value: &str) -> IoResult<u8> {
    value
        .parse::<u8>()
        .ok()
        .filter(|q| (1..=100).contains(q))
        .ok_or_else(|| IoError::InvalidOption(format!("jpeg quality must be 1-100, got '{value}'")))
}

impl FromStr for EncodeOptions {
    type Err = IoError;

    fn from_str(s: &str) -> IoResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for EncodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeOptions::Png(png) => {
                f.write_str(if png.indexed { "png8" } else { "png32" })?;
                if let Some(z) = png.compression {
                    write!(f, ":z={z}")?;
                }
                Ok(())
            }
            EncodeOptions::Jpeg(jpeg) => write!(f, "jpeg{}", jpeg.quality),
            EncodeOptions::Tiff(tiff) => match tiff.compression {
                TiffCompression::None => f.write_str("tiff"),
                TiffCompression::Lzw => f.write_str("tiff:compression=lzw"),
                TiffCompression::Deflate => f.write_str("tiff:compression=deflate"),
                TiffCompression::PackBits => f.write_str("tiff:compression=packbits"),
            },
        }
    }
}
