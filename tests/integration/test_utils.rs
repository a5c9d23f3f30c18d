//! Test utilities for integration tests.
//!
//! This module provides helper functions for building test images,
//! multipart request bodies, and routers backed by a temporary directory.

use std::sync::Arc;

use axum::Router;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, ImageReader, Rgb, RgbImage};
use tempfile::TempDir;

use carousel_server::carousel::{IngestPipeline, SlideRegistry};
use carousel_server::server::{create_router, RouterConfig};
use carousel_server::store::FsBlobStore;
use carousel_server::transcode::Transcoder;

// =============================================================================
// Test App Construction
// =============================================================================

/// A router plus handles to its registry and backing storage.
///
/// The `TempDir` must stay alive for as long as the router is used; dropping
/// it deletes the blob directory.
pub struct TestApp {
    pub router: Router,
    pub registry: Arc<SlideRegistry>,
    pub store: Arc<FsBlobStore>,
    pub _storage_dir: TempDir,
}

/// Build a router over a fresh temporary blob directory.
pub fn test_app() -> TestApp {
    let storage_dir = tempfile::tempdir().expect("create temp storage dir");
    let store = Arc::new(FsBlobStore::create(storage_dir.path()).expect("create blob store"));
    let registry = Arc::new(SlideRegistry::new());
    let pipeline = IngestPipeline::new(
        Transcoder::new(),
        Arc::clone(&store),
        Arc::clone(&registry),
    );

    let router = create_router(pipeline, RouterConfig::new().with_tracing(false));

    TestApp {
        router,
        registry,
        store,
        _storage_dir: storage_dir,
    }
}

// =============================================================================
// Test Image Creation
// =============================================================================

/// Create a test PNG image with a simple gradient pattern.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x % 256) as u8;
        let g = (y % 256) as u8;
        let b = ((x + y) % 256) as u8;
        Rgb([r, g, b])
    });

    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(&img, width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Create a test RGB JPEG image.
pub fn create_test_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x % 256) as u8;
        let g = (y % 256) as u8;
        let b = ((x + y) % 256) as u8;
        Rgb([r, g, b])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(&img).unwrap();
    buf
}

// =============================================================================
// Multipart Body Construction
// =============================================================================

/// Boundary used by [`multipart_body`]; pass it to [`multipart_content_type`].
pub const TEST_BOUNDARY: &str = "----carousel-test-boundary";

/// The Content-Type header value matching [`multipart_body`].
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", TEST_BOUNDARY)
}

/// Build a multipart/form-data body with an optional image part and any
/// number of text fields.
pub fn multipart_body(image: Option<&[u8]>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(data) = image {
        body.extend_from_slice(format!("--{}\r\n", TEST_BOUNDARY).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"image\"; filename=\"upload.png\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", TEST_BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", TEST_BOUNDARY).as_bytes());
    body
}

// =============================================================================
// Validation Helpers
// =============================================================================

/// Check that data is a decodable WebP image, returning its dimensions.
pub fn decode_webp_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 12 || &data[0..4] != b"RIFF" || &data[8..12] != b"WEBP" {
        return None;
    }

    ImageReader::with_format(std::io::Cursor::new(data), image::ImageFormat::WebP)
        .into_dimensions()
        .ok()
}

/// Check if data is a valid WebP image.
pub fn is_valid_webp(data: &[u8]) -> bool {
    decode_webp_dimensions(data).is_some()
}
