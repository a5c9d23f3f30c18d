//! WebP transcoder.
//!
//! This module decodes an uploaded image (any supported source format) and
//! re-encodes it as lossy WebP at a fixed quality setting.
//!
//! # Design Decisions
//!
//! - **Always decode/encode**: uploads are always normalized, even when the
//!   source is already WebP. No passthrough optimization.
//!
//! - **No resizing**: images keep their native pixel dimensions; only the
//!   encoding changes.
//!
//! - **Pure transform**: bytes in, bytes plus metadata out. No side effects.

use bytes::Bytes;

use crate::error::TranscodeError;

use super::detect::{detect_format, SourceFormat};

/// Default WebP quality (0-100 scale).
pub const DEFAULT_WEBP_QUALITY: f32 = 82.0;

/// Maximum allowed WebP quality.
pub const MAX_WEBP_QUALITY: f32 = 100.0;

/// File extension for the canonical stored format.
pub const CANONICAL_EXT: &str = "webp";

/// Content type served for stored images.
pub const CANONICAL_CONTENT_TYPE: &str = "image/webp";

// =============================================================================
// Transcoder
// =============================================================================

/// Decodes a source image and re-encodes it as lossy WebP.
///
/// # Example
///
/// ```ignore
/// use carousel_server::transcode::Transcoder;
///
/// let transcoder = Transcoder::new();
/// let output = transcoder.transcode(&png_bytes)?;
/// println!("{}x{} {} -> {} WebP bytes",
///     output.width, output.height, output.source_format.name(), output.data.len());
/// ```
#[derive(Debug, Clone)]
pub struct Transcoder {
    quality: f32,
}

/// Result of a successful transcode.
#[derive(Debug, Clone)]
pub struct TranscodeOutput {
    /// Encoded WebP bytes
    pub data: Bytes,

    /// Width of the decoded image in pixels
    pub width: u32,

    /// Height of the decoded image in pixels
    pub height: u32,

    /// Format the source bytes were detected as
    pub source_format: SourceFormat,
}

impl Transcoder {
    /// Create a transcoder with the default quality.
    pub fn new() -> Self {
        Self {
            quality: DEFAULT_WEBP_QUALITY,
        }
    }

    /// Create a transcoder with a specific quality, clamped to 0-100.
    pub fn with_quality(quality: f32) -> Self {
        Self {
            quality: quality.clamp(0.0, MAX_WEBP_QUALITY),
        }
    }

    /// Get the configured WebP quality.
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Decode the source buffer and re-encode it as lossy WebP.
    ///
    /// The source format is detected from content, not from any filename.
    ///
    /// # Errors
    ///
    /// - [`TranscodeError::Decode`] if the buffer is not a supported raster
    ///   format or is corrupt
    /// - [`TranscodeError::Encode`] if WebP encoding fails
    pub fn transcode(&self, source: &[u8]) -> Result<TranscodeOutput, TranscodeError> {
        let source_format = detect_format(source)
            .ok_or_else(|| TranscodeError::Decode("unrecognized image format".to_string()))?;

        let img = image::load_from_memory_with_format(source, source_format.image_format())
            .map_err(|e| TranscodeError::Decode(e.to_string()))?;

        let (width, height) = (img.width(), img.height());

        // libwebp wants RGBA input; convert whatever pixel layout we decoded
        let rgba = img.to_rgba8();
        let encoded = webp::Encoder::from_rgba(&rgba, width, height)
            .encode_simple(false, self.quality)
            .map_err(|e| TranscodeError::Encode(format!("{:?}", e)))?;

        Ok(TranscodeOutput {
            data: Bytes::copy_from_slice(&encoded),
            width,
            height,
            source_format,
        })
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
