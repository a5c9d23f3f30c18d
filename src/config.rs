//! Configuration management for the carousel server.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `CAROUSEL_` prefix
//! - Sensible defaults for all settings
//!
//! # Example
//!
//! ```ignore
//! use carousel_server::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! println!("Storing images under {}", config.storage_dir);
//! ```
//!
//! # Environment Variables
//!
//! All configuration options can be set via environment variables:
//!
//! - `CAROUSEL_HOST` - Server bind address (default: 0.0.0.0)
//! - `CAROUSEL_PORT` - API port (default: 10022)
//! - `CAROUSEL_METRICS_PORT` - Prometheus scrape port (default: 9222)
//! - `STORAGE_BACKEND` - Registry backend selector (default: memory)
//! - `CAROUSEL_STORAGE_DIR` - Image blob directory (default: ./carousel_images)
//! - `CAROUSEL_PRELOAD_DIR` - Startup preload directory (default: ./preload_images)
//! - `CAROUSEL_WEBP_QUALITY` - WebP encode quality 1-100 (default: 82)
//! - `CAROUSEL_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 3600)
//! - `CAROUSEL_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use clap::{Parser, ValueEnum};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default API port.
pub const DEFAULT_PORT: u16 = 10022;

/// Default Prometheus metrics port.
pub const DEFAULT_METRICS_PORT: u16 = 9222;

/// Default directory for stored image blobs.
pub const DEFAULT_STORAGE_DIR: &str = "./carousel_images";

/// Default directory scanned for images at startup.
pub const DEFAULT_PRELOAD_DIR: &str = "./preload_images";

/// Default WebP encode quality.
pub const DEFAULT_WEBP_QUALITY_ARG: u8 = 82;

/// Default HTTP cache max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// Backend Selection
// =============================================================================

/// Registry backend selector.
///
/// Only the in-memory registry exists today; the selector is kept so the
/// flag and `STORAGE_BACKEND` variable stay stable when more backends land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// In-memory slide registry (blobs always live on disk)
    Memory,
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// Carousel server - manages a rotating set of images over HTTP.
///
/// Accepts image uploads, normalizes them to WebP, stores them on local
/// disk, and serves them back alongside slide metadata.
#[derive(Parser, Debug, Clone)]
#[command(name = "carousel-server")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "CAROUSEL_HOST")]
    pub host: String,

    /// Port the carousel API listens on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "CAROUSEL_PORT")]
    pub port: u16,

    /// Port the Prometheus /metrics endpoint listens on.
    #[arg(long, default_value_t = DEFAULT_METRICS_PORT, env = "CAROUSEL_METRICS_PORT")]
    pub metrics_port: u16,

    // =========================================================================
    // Storage Configuration
    // =========================================================================
    /// Slide registry backend.
    #[arg(long, value_enum, default_value_t = StorageBackend::Memory, env = "STORAGE_BACKEND")]
    pub storage_backend: StorageBackend,

    /// Directory encoded images are stored under (created if absent).
    #[arg(long, default_value = DEFAULT_STORAGE_DIR, env = "CAROUSEL_STORAGE_DIR")]
    pub storage_dir: String,

    /// Directory scanned once at startup for images to preload.
    #[arg(long, default_value = DEFAULT_PRELOAD_DIR, env = "CAROUSEL_PRELOAD_DIR")]
    pub preload_dir: String,

    // =========================================================================
    // Image Configuration
    // =========================================================================
    /// WebP encode quality (1-100).
    #[arg(long, default_value_t = DEFAULT_WEBP_QUALITY_ARG, env = "CAROUSEL_WEBP_QUALITY")]
    pub webp_quality: u8,

    /// HTTP Cache-Control max-age in seconds for served images.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "CAROUSEL_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "CAROUSEL_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        // Validate WebP quality
        if self.webp_quality == 0 || self.webp_quality > 100 {
            return Err("webp_quality must be between 1 and 100".to_string());
        }

        // The API and metrics listeners cannot share a port
        if self.port == self.metrics_port {
            return Err(format!(
                "port and metrics_port must differ (both are {})",
                self.port
            ));
        }

        // Validate storage directory
        if self.storage_dir.is_empty() {
            return Err(
                "Storage directory is required. Set --storage-dir or CAROUSEL_STORAGE_DIR"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Get the API bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the metrics bind address as "host:metrics_port".
    pub fn metrics_bind_address(&self) -> String {
        format!("{}:{}", self.host, self.metrics_port)
    }
}

// =============================================================================
// Tests
// =============================================================================
