//! Router configuration for the carousel server.
//!
//! This module defines the HTTP routes and applies middleware for body
//! limits, CORS, and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /health              - Health check
//! /carousel            - List slides (GET), add a slide (POST)
//! /carousel/{id}       - Remove a slide (DELETE)
//! /serve?id={id}       - Serve a stored image
//! ```
//!
//! The Prometheus scrape endpoint lives on its own router (and its own
//! listener); see [`create_metrics_router`].
//!
//! # Example
//!
//! ```ignore
//! use carousel_server::carousel::{IngestPipeline, SlideRegistry};
//! use carousel_server::server::routes::{create_router, RouterConfig};
//! use carousel_server::store::FsBlobStore;
//! use carousel_server::transcode::Transcoder;
//! use std::sync::Arc;
//!
//! let store = Arc::new(FsBlobStore::create("./carousel_images")?);
//! let registry = Arc::new(SlideRegistry::new());
//! let pipeline = IngestPipeline::new(Transcoder::new(), store, registry);
//!
//! let router = create_router(pipeline, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:10022").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_slide_handler, delete_slide_handler, health_handler, list_slides_handler,
    serve_image_handler, AppState,
};
use crate::carousel::IngestPipeline;
use crate::store::BlobStore;

/// Maximum accepted request body size (32 MiB).
///
/// Applied to multipart uploads via [`DefaultBodyLimit`] and to raw JSON
/// body reads in the add-slide handler.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Cache-Control max-age in seconds for served images
    pub cache_max_age: u32,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Cache max-age is 1 hour (3600 seconds)
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None, // Allow any origin by default
            cache_max_age: 3600,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the Cache-Control max-age in seconds.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Carousel management routes (list, add, delete)
/// - Image serving and health check routes
/// - An upload body limit
/// - CORS configuration
/// - Request tracing (optional)
///
/// # Arguments
///
/// * `pipeline` - The ingestion pipeline handling uploads (and holding the
///   registry and blob store)
/// * `config` - Router configuration
///
/// # Returns
///
/// A configured Axum router ready to be served.
pub fn create_router<B>(pipeline: IngestPipeline<B>, config: RouterConfig) -> Router
where
    B: BlobStore,
{
    // Create application state
    let app_state = AppState::with_cache_max_age(pipeline, config.cache_max_age);

    // Build CORS layer
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route(
            "/carousel",
            get(list_slides_handler::<B>).post(add_slide_handler::<B>),
        )
        .route("/carousel/{id}", delete(delete_slide_handler::<B>))
        .route("/serve", get(serve_image_handler::<B>))
        .route("/health", get(health_handler))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors);

    // Add tracing if enabled
    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Create the metrics router served on the dedicated metrics port.
///
/// Exposes `GET /metrics` rendering the Prometheus text format from the
/// installed recorder.
pub fn create_metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || std::future::ready(handle.render())),
    )
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            // Parse origins into HeaderValues
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
