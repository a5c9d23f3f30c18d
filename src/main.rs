//! Carousel server - manages a rotating set of images over HTTP.
//!
//! This binary starts the HTTP server and configures all components.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use metrics::gauge;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carousel_server::{
    carousel::{IngestPipeline, SlideRegistry},
    config::Config,
    server::{create_metrics_router, create_router, RouterConfig},
    store::FsBlobStore,
    transcode::Transcoder,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Storage backend: {:?}", config.storage_backend);
    info!("  Storage dir: {}", config.storage_dir);
    info!("  Preload dir: {}", config.preload_dir);
    info!("  WebP quality: {}", config.webp_quality);

    // Install the Prometheus recorder before anything records a metric
    let metrics_handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to install metrics recorder: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Create the blob store; a missing or unwritable directory is fatal
    let store = match FsBlobStore::create(&config.storage_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(
                "Failed to create storage directory {}: {}",
                config.storage_dir, e
            );
            return ExitCode::FAILURE;
        }
    };

    // Assemble the ingestion pipeline
    let registry = Arc::new(SlideRegistry::new());
    let transcoder = Transcoder::with_quality(config.webp_quality as f32);
    let pipeline = IngestPipeline::new(transcoder, store, Arc::clone(&registry));

    // Preload bundled images before accepting traffic
    let preloaded = pipeline.preload(std::path::Path::new(&config.preload_dir)).await;
    if preloaded > 0 {
        info!("Preloaded {} image(s) into the carousel", preloaded);
    }

    // Periodically export the registry size as a gauge
    {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(10));
            loop {
                interval.tick().await;
                gauge!("carousel_slides").set(registry.len().await as f64);
            }
        });
    }

    // Build routers
    let router_config = build_router_config(&config);
    let app = create_router(pipeline, router_config);
    let metrics_app = create_metrics_router(metrics_handle);

    // Bind both listeners before serving
    let addr = config.bind_address();
    let api_listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    let metrics_addr = config.metrics_bind_address();
    let metrics_listener = match tokio::net::TcpListener::bind(&metrics_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind metrics listener to {}: {}", metrics_addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Carousel API listening on http://{}", addr);
    info!("Metrics available at http://{}/metrics", metrics_addr);

    let api_server = tokio::spawn(async move { axum::serve(api_listener, app).await });
    let metrics_server =
        tokio::spawn(async move { axum::serve(metrics_listener, metrics_app).await });

    // Either listener dying takes the process down
    tokio::select! {
        result = api_server => {
            error!("API server exited: {:?}", result);
        }
        result = metrics_server => {
            error!("Metrics server exited: {:?}", result);
        }
    }

    ExitCode::FAILURE
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "carousel_server=debug,tower_http=debug"
    } else {
        "carousel_server=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_cache_max_age(config.cache_max_age);

    // Apply CORS origins
    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    // Apply tracing setting
    router_config = router_config.with_tracing(!config.no_tracing);

    router_config
}
