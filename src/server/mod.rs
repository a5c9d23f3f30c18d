//! HTTP server layer: Axum handlers and router wiring.

pub mod handlers;
pub mod routes;

pub use handlers::{ApiError, AppState, ErrorResponse, HealthResponse};
pub use routes::{create_metrics_router, create_router, RouterConfig, MAX_UPLOAD_BYTES};
