//! Source format detection for uploaded images.
//!
//! Detection is based on content sniffing, never on the filename: a fixed
//! table of magic-byte probes is tried in order against the start of the
//! buffer. Currently recognized formats:
//!
//! - **PNG**: `\x89PNG\r\n\x1a\n`
//! - **JPEG**: `FF D8 FF`
//! - **GIF**: `GIF8`
//! - **BMP**: `BM`
//! - **WebP**: RIFF container with a `WEBP` fourcc
//!
//! Unrecognized buffers map to a decode error upstream.

// =============================================================================
// SourceFormat
// =============================================================================

/// Detected format of an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    WebP,
}

impl SourceFormat {
    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            SourceFormat::Png => "PNG",
            SourceFormat::Jpeg => "JPEG",
            SourceFormat::Gif => "GIF",
            SourceFormat::Bmp => "BMP",
            SourceFormat::WebP => "WebP",
        }
    }

    /// Map to the corresponding `image` crate format for decoding.
    pub const fn image_format(&self) -> image::ImageFormat {
        match self {
            SourceFormat::Png => image::ImageFormat::Png,
            SourceFormat::Jpeg => image::ImageFormat::Jpeg,
            SourceFormat::Gif => image::ImageFormat::Gif,
            SourceFormat::Bmp => image::ImageFormat::Bmp,
            SourceFormat::WebP => image::ImageFormat::WebP,
        }
    }

    /// Match a file extension (case-insensitive, without the leading dot).
    ///
    /// This is only used by the preload scan to pre-filter directory
    /// entries; actual ingestion always re-detects from content.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(SourceFormat::Png),
            "jpg" | "jpeg" => Some(SourceFormat::Jpeg),
            "gif" => Some(SourceFormat::Gif),
            "bmp" => Some(SourceFormat::Bmp),
            "webp" => Some(SourceFormat::WebP),
            _ => None,
        }
    }
}

// =============================================================================
// Format Detection
// =============================================================================

/// A magic-byte probe: expected bytes at a fixed offset.
struct Probe {
    format: SourceFormat,
    checks: &'static [(usize, &'static [u8])],
}

/// Probe table, tried in order. WebP is checked before BMP so the RIFF
/// container check runs before the looser two-byte BMP check.
const PROBES: &[Probe] = &[
    Probe {
        format: SourceFormat::Png,
        checks: &[(0, b"\x89PNG\r\n\x1a\n")],
    },
    Probe {
        format: SourceFormat::Jpeg,
        checks: &[(0, &[0xFF, 0xD8, 0xFF])],
    },
    Probe {
        format: SourceFormat::Gif,
        checks: &[(0, b"GIF8")],
    },
    Probe {
        format: SourceFormat::WebP,
        checks: &[(0, b"RIFF"), (8, b"WEBP")],
    },
    Probe {
        format: SourceFormat::Bmp,
        checks: &[(0, b"BM")],
    },
];

impl Probe {
    fn matches(&self, data: &[u8]) -> bool {
        self.checks.iter().all(|(offset, magic)| {
            data.len() >= offset + magic.len() && &data[*offset..offset + magic.len()] == *magic
        })
    }
}

/// Detect the format of an image buffer from its magic bytes.
///
/// Returns `None` if no probe matches (including for empty buffers).
pub fn detect_format(data: &[u8]) -> Option<SourceFormat> {
    PROBES.iter().find(|p| p.matches(data)).map(|p| p.format)
}

// =============================================================================
// Tests
// =============================================================================
