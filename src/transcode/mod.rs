//! Image transcoding layer.
//!
//! Every image that enters the carousel goes through this module: the source
//! format is sniffed from magic bytes, the image is decoded, and the pixels
//! are re-encoded as lossy WebP at a fixed quality.
//!
//! # Format Detection
//!
//! Use [`detect::detect_format`] to identify a buffer by content. Supported
//! source formats: PNG, JPEG, GIF, BMP, WebP.

pub mod detect;
pub mod encoder;

pub use detect::{detect_format, SourceFormat};
pub use encoder::{
    TranscodeOutput, Transcoder, CANONICAL_CONTENT_TYPE, CANONICAL_EXT, DEFAULT_WEBP_QUALITY,
    MAX_WEBP_QUALITY,
};
