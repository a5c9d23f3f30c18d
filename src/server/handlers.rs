//! HTTP request handlers for the carousel API.
//!
//! This module contains the Axum handlers for managing slides and serving
//! stored images.
//!
//! # Endpoints
//!
//! - `GET /carousel` - List all slides
//! - `POST /carousel` - Add a slide (multipart upload or JSON)
//! - `DELETE /carousel/{id}` - Remove a slide
//! - `GET /serve` - Serve a stored image by id
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::routes::MAX_UPLOAD_BYTES;
use crate::carousel::{IngestPipeline, Slide};
use crate::error::{IngestError, StoreError, TranscodeError};
use crate::store::BlobStore;
use crate::transcode::CANONICAL_CONTENT_TYPE;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the ingestion pipeline.
///
/// This is passed to all handlers via Axum's State extractor. The pipeline
/// owns the blob store and registry, so state is a single Arc.
pub struct AppState<B: BlobStore> {
    /// The ingestion pipeline (also grants access to registry and store)
    pub pipeline: Arc<IngestPipeline<B>>,

    /// Cache control max-age in seconds for served images
    pub cache_max_age: u32,
}

impl<B: BlobStore> AppState<B> {
    /// Create a new application state with the given pipeline.
    pub fn new(pipeline: IngestPipeline<B>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            cache_max_age: 3600, // 1 hour default
        }
    }

    /// Create a new application state with custom cache max-age.
    pub fn with_cache_max_age(pipeline: IngestPipeline<B>, cache_max_age: u32) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            cache_max_age,
        }
    }
}

impl<B: BlobStore> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for image serving.
#[derive(Debug, Deserialize)]
pub struct ServeQueryParams {
    /// Slide identifier whose image to serve
    pub id: String,
}

/// JSON body accepted by the add-slide endpoint.
///
/// A JSON request carries no image bytes (the historical `image_url` field
/// is accepted but not fetched), so it is always rejected with 400; the
/// shape is kept so clients get a proper JSON error rather than a parse
/// failure.
#[derive(Debug, Default, Deserialize)]
pub struct AddSlideRequest {
    /// Free-text label for the slide
    #[serde(default)]
    pub title: String,

    /// Attribution link
    #[serde(default)]
    pub source_url: String,

    /// Accepted for compatibility; remote fetch is not supported
    #[serde(default)]
    pub image_url: String,
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "invalid_image")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Error type covering every handler failure mode.
#[derive(Debug)]
pub enum ApiError {
    /// Ingestion failed (missing image, undecodable bytes, or storage)
    Ingest(IngestError),

    /// Blob store failure while serving an image
    Store(StoreError),

    /// Malformed request (bad multipart body, unparsable JSON, ...)
    BadRequest(String),

    /// The requested slide or image does not exist
    NotFound(String),
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        ApiError::Ingest(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => {
                ApiError::NotFound(format!("No image stored for id: {}", id))
            }
            other => ApiError::Store(other),
        }
    }
}

/// Convert ApiError to HTTP response.
///
/// This implementation logs errors appropriately based on their severity:
/// - 4xx errors are logged at WARN level (client errors), 404s at DEBUG
/// - 5xx errors are logged at ERROR level (server errors)
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            // 400 Bad Request - no usable image in the request
            ApiError::Ingest(IngestError::NoImage) => (
                StatusCode::BAD_REQUEST,
                "no_image",
                "No image data provided (upload a file via multipart field 'image')".to_string(),
            ),

            ApiError::Ingest(IngestError::Transcode(TranscodeError::Decode(msg))) => (
                StatusCode::BAD_REQUEST,
                "invalid_image",
                format!("Could not decode image: {}", msg),
            ),

            // 500 Internal Server Error - encoding and storage failures
            ApiError::Ingest(IngestError::Transcode(TranscodeError::Encode(msg))) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "encode_error",
                format!("Failed to encode image: {}", msg),
            ),

            ApiError::Ingest(IngestError::Store(store_err)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                format!("Storage error: {}", store_err),
            ),

            ApiError::Store(store_err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                format!("Storage error: {}", store_err),
            ),

            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg.clone()),

            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
        };

        // Log errors based on severity
        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if status == StatusCode::NOT_FOUND {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle carousel listing requests.
///
/// # Endpoint
///
/// `GET /carousel`
///
/// # Response
///
/// `200 OK` with a JSON array of slides (possibly empty):
/// ```json
/// [
///   {
///     "id": "3f1a...",
///     "image_url": "/serve?id=3f1a...",
///     "title": "Swiss Alps",
///     "source_url": "https://example.com",
///     "created_at": "2026-08-30T12:00:00Z"
///   }
/// ]
/// ```
pub async fn list_slides_handler<B: BlobStore>(
    State(state): State<AppState<B>>,
) -> Json<Vec<Slide>> {
    let slides = state.pipeline.registry().list().await;
    Json(slides)
}

/// Handle slide creation requests.
///
/// # Endpoint
///
/// `POST /carousel`
///
/// # Request
///
/// Either a `multipart/form-data` body with fields:
/// - `image`: image file (PNG, JPEG, GIF, BMP, or WebP) - required
/// - `title`: free-text label - optional
/// - `source_url`: attribution link - optional
///
/// or a JSON body (`{"title", "source_url", "image_url"}`). JSON requests
/// carry no image bytes and are rejected with 400.
///
/// # Response
///
/// - `201 Created`: the new slide as JSON
/// - `400 Bad Request`: no image, undecodable image, or malformed body
/// - `500 Internal Server Error`: encode or storage failure
pub async fn add_slide_handler<B: BlobStore>(
    State(state): State<AppState<B>>,
    request: Request,
) -> Result<(StatusCode, Json<Slide>), ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let (image, title, source_url) = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?;
        read_multipart_fields(multipart).await?
    } else {
        // Raw body reads bypass DefaultBodyLimit, so cap here as well
        let bytes = axum::body::to_bytes(request.into_body(), MAX_UPLOAD_BYTES)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read request body: {}", e)))?;
        let body: AddSlideRequest = if bytes.is_empty() {
            AddSlideRequest::default()
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?
        };
        // No image bytes in a JSON request; ingest rejects with NoImage
        (None, body.title, body.source_url)
    };

    let slide = state.pipeline.ingest(image, &title, &source_url).await?;

    Ok((StatusCode::CREATED, Json(slide)))
}

/// Pull the image bytes and metadata fields out of a multipart body.
///
/// Unknown fields are ignored. If the same field repeats, the last
/// occurrence wins.
async fn read_multipart_fields(
    mut multipart: Multipart,
) -> Result<(Option<Bytes>, String, String), ApiError> {
    let mut image: Option<Bytes> = None;
    let mut title = String::new();
    let mut source_url = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "image" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
                image = Some(data);
            }
            "title" => {
                title = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid 'title' field: {}", e)))?;
            }
            "source_url" => {
                source_url = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Invalid 'source_url' field: {}", e))
                })?;
            }
            _ => {
                debug!(field = %name, "Ignoring unknown multipart field");
            }
        }
    }

    Ok((image, title, source_url))
}

/// Handle slide deletion requests.
///
/// # Endpoint
///
/// `DELETE /carousel/{id}`
///
/// # Response
///
/// - `204 No Content`: slide removed from the registry
/// - `404 Not Found`: no slide with that id
///
/// The stored image blob is left on disk; only the registry entry goes away.
pub async fn delete_slide_handler<B: BlobStore>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.pipeline.registry().delete(&id).await {
        return Err(ApiError::NotFound(format!("Slide not found: {}", id)));
    }

    counter!("carousel_slides_deleted_total").increment(1);
    info!(id = %id, "Slide deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Handle image serving requests.
///
/// # Endpoint
///
/// `GET /serve?id={id}`
///
/// # Response
///
/// - `200 OK`: WebP image bytes with `Content-Type: image/webp`
/// - `404 Not Found`: unknown id, or the blob is missing from storage
/// - `500 Internal Server Error`: storage read failure
///
/// # Headers
///
/// - `Content-Type: image/webp`
/// - `Cache-Control: public, max-age={cache_max_age}`
pub async fn serve_image_handler<B: BlobStore>(
    State(state): State<AppState<B>>,
    Query(query): Query<ServeQueryParams>,
) -> Result<Response, ApiError> {
    // The registry is checked first so a stale blob for a deleted slide
    // is not servable.
    if state.pipeline.registry().get(&query.id).await.is_none() {
        return Err(ApiError::NotFound(format!("Slide not found: {}", query.id)));
    }

    let data = state.pipeline.store().open(&query.id).await?;

    counter!("carousel_images_served_total").increment(1);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, CANONICAL_CONTENT_TYPE)
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.cache_max_age),
        )
        .body(axum::body::Body::from(data))
        .map_err(|e| {
            ApiError::Store(StoreError::Read {
                id: query.id.clone(),
                message: e.to_string(),
            })
        })?;

    Ok(response)
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
