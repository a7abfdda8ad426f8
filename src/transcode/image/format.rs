//! Image formats.
//!
//! A format is an identifier plus a flag telling whether its bytes are encoded. The
//! predefined constants live in [`formats`]; plugins may declare their own with
//! [`Format::encoded`].

use std::fmt;

/// Maximum identifier length in bytes.
pub const MAX_IDENTIFIER_LEN: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Format {
    identifier: &'static str,
    encoded: bool,
}

impl Format {
    /// Declares an encoded format. Identifiers longer than [`MAX_IDENTIFIER_LEN`] fail
    /// constant evaluation.
    pub const fn encoded(identifier: &'static str) -> Self {
        assert!(identifier.len() <= MAX_IDENTIFIER_LEN);
        Self {
            identifier,
            encoded: true,
        }
    }

    const fn raw(identifier: &'static str) -> Self {
        Self {
            identifier,
            encoded: false,
        }
    }

    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    pub fn is_encoded(&self) -> bool {
        self.encoded
    }

    /// Looks a predefined format up by identifier.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        formats::ALL
            .iter()
            .copied()
            .find(|format| format.identifier.eq_ignore_ascii_case(identifier))
    }

    /// Detects a predefined format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" | "jfif" => Some(formats::JPEG),
            "png" => Some(formats::PNG),
            "webp" => Some(formats::WEBP),
            "gif" => Some(formats::GIF),
            "heic" | "heif" => Some(formats::HEIF),
            "avif" => Some(formats::AVIF),
            "tif" | "tiff" => Some(formats::TIFF),
            "arw" | "nef" | "dng" | "cr2" | "raf" | "orf" | "rw2" => Some(formats::RAW),
            "bmp" | "rgb" | "bitmap" | "raw8" => Some(formats::BITMAP),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier)
    }
}

pub mod formats {
    use super::Format;

    /// Uncompressed rows of pixels in a known pixel specification.
    pub const BITMAP: Format = Format::raw("bitmap");
    pub const JPEG: Format = Format::encoded("jpeg");
    pub const PNG: Format = Format::encoded("png");
    pub const WEBP: Format = Format::encoded("webp");
    pub const GIF: Format = Format::encoded("gif");
    pub const HEIF: Format = Format::encoded("heif");
    pub const AVIF: Format = Format::encoded("avif");
    pub const TIFF: Format = Format::encoded("tiff");
    /// Camera sensor dumps (ARW, NEF, DNG, ...).
    pub const RAW: Format = Format::encoded("raw");

    pub const ALL: [Format; 9] = [BITMAP, JPEG, PNG, WEBP, GIF, HEIF, AVIF, TIFF, RAW];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_includes_encoded_flag() {
        assert_eq!(formats::PNG, Format::encoded("png"));
        assert_ne!(formats::BITMAP, Format::encoded("bitmap"));
        assert!(!formats::BITMAP.is_encoded());
    }

    #[test]
    fn lookup_by_identifier_and_extension() {
        assert_eq!(Format::from_identifier("JPEG"), Some(formats::JPEG));
        assert_eq!(Format::from_identifier("nope"), None);
        assert_eq!(Format::from_extension("ARW"), Some(formats::RAW));
        assert_eq!(Format::from_extension("tif"), Some(formats::TIFF));
        assert_eq!(Format::from_extension("xyz"), None);
    }
}
