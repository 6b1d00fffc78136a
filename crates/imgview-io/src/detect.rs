//! Format detection from file extensions and magic bytes.

use std::path::Path;

/// Encoded image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
    /// TIFF format.
    Tiff,
    /// Unknown/unsupported format.
    Unknown,
}

impl Format {
    /// Detects format from the file extension, case-insensitively.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => Format::Png,
            Some("jpg") | Some("jpeg") => Format::Jpeg,
            Some("tif") | Some("tiff") => Format::Tiff,
            _ => Format::Unknown,
        }
    }

    /// Detects format from raw bytes (magic number check).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        // PNG: 0x89 'P' 'N' 'G' \r \n 0x1A \n
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Format::Png;
        }
        // JPEG: SOI marker followed by another marker
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Format::Jpeg;
        }
        // TIFF: II*\0 (little-endian) or MM\0* (big-endian)
        if bytes.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || bytes.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Format::Tiff;
        }
        Format::Unknown
    }

    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Jpeg => "jpg",
            Format::Tiff => "tif",
            Format::Unknown => "",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Png => "image/png",
            Format::Jpeg => "image/jpeg",
            Format::Tiff => "image/tiff",
            Format::Unknown => "application/octet-stream",
        }
    }

    /// Returns true if the format keeps an alpha channel.
    pub fn supports_alpha(&self) -> bool {
        matches!(self, Format::Png | Format::Tiff)
    }
}

/// Guesses the output format from a path's extension.
///
/// Returns [`Format::Unknown`] for missing or unrecognised extensions.
pub fn guess_format<P: AsRef<Path>>(path: P) -> Format {
    Format::from_extension(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_detection() {
        assert_eq!(Format::from_extension("a.png"), Format::Png);
        assert_eq!(Format::from_extension("a.PNG"), Format::Png);
        assert_eq!(Format::from_extension("a.jpg"), Format::Jpeg);
        assert_eq!(Format::from_extension("dir/a.JPEG"), Format::Jpeg);
        assert_eq!(Format::from_extension("a.tif"), Format::Tiff);
        assert_eq!(Format::from_extension("a.tiff"), Format::Tiff);
        assert_eq!(guess_format("a.xyz"), Format::Unknown);
        assert_eq!(guess_format("noext"), Format::Unknown);
    }

    #[test]
    fn test_magic_bytes() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(Format::from_bytes(&png), Format::Png);
        assert_eq!(Format::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Format::Jpeg);
        assert_eq!(Format::from_bytes(&[0x49, 0x49, 0x2A, 0x00]), Format::Tiff);
        assert_eq!(Format::from_bytes(&[0x4D, 0x4D, 0x00, 0x2A]), Format::Tiff);
        assert_eq!(Format::from_bytes(&[0x00, 0x01]), Format::Unknown);
    }

    #[test]
    fn test_format_properties() {
        assert_eq!(Format::Jpeg.extension(), "jpg");
        assert_eq!(Format::Png.mime_type(), "image/png");
        assert!(!Format::Jpeg.supports_alpha());
    }
}
