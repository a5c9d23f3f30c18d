//! # Carousel Server
//!
//! An HTTP service managing a rotating set of images (a carousel).
//!
//! Images arrive as multipart uploads, are normalized to lossy WebP, stored
//! as flat files on local disk, and served back by id alongside JSON slide
//! metadata. The slide registry lives in memory; blobs survive restarts but
//! their registry entries do not.
//!
//! ## Features
//!
//! - **Canonical format**: every accepted image (PNG, JPEG, GIF, BMP, WebP)
//!   is re-encoded to lossy WebP at a configurable quality
//! - **Startup preload**: a directory of bundled images is ingested before
//!   the server accepts traffic
//! - **Prometheus metrics**: counters and gauges exposed on a dedicated port
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`transcode`] - Format detection and WebP encoding
//! - [`store`] - Blob storage (local filesystem)
//! - [`carousel`] - Slide metadata, registry, and the ingestion pipeline
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use carousel_server::carousel::{IngestPipeline, SlideRegistry};
//! use carousel_server::server::{create_router, RouterConfig};
//! use carousel_server::store::FsBlobStore;
//! use carousel_server::transcode::Transcoder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FsBlobStore::create("./carousel_images")?);
//!     let registry = Arc::new(SlideRegistry::new());
//!     let pipeline = IngestPipeline::new(Transcoder::new(), store, registry);
//!
//!     let router = create_router(pipeline, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:10022").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod carousel;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod transcode;

// Re-export commonly used types
pub use carousel::{serve_url, IngestPipeline, Slide, SlideRegistry, PRELOAD_TITLE_PREFIX};
pub use config::{Config, StorageBackend};
pub use error::{IngestError, StoreError, TranscodeError};
pub use server::{
    create_metrics_router, create_router, ApiError, AppState, ErrorResponse, HealthResponse,
    RouterConfig, MAX_UPLOAD_BYTES,
};
pub use store::{BlobStore, FsBlobStore};
pub use transcode::{
    detect_format, SourceFormat, TranscodeOutput, Transcoder, CANONICAL_CONTENT_TYPE,
    CANONICAL_EXT, DEFAULT_WEBP_QUALITY, MAX_WEBP_QUALITY,
};
