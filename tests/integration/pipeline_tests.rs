//! Integration tests for the startup preload against real storage.
//!
//! These exercise the ingestion pipeline end to end with the filesystem
//! blob store: a preload directory is scanned, images are normalized to
//! WebP on disk, and the registry reflects the results through the router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use carousel_server::carousel::{IngestPipeline, SlideRegistry};
use carousel_server::server::{create_router, RouterConfig};
use carousel_server::store::{BlobStore, FsBlobStore};
use carousel_server::transcode::Transcoder;

use super::test_utils::{create_test_jpeg, create_test_png, is_valid_webp};

#[tokio::test]
async fn test_preload_then_serve_over_http() {
    let storage_dir = tempfile::tempdir().unwrap();
    let preload_dir = tempfile::tempdir().unwrap();

    // Three valid images, one corrupt, one with an unsupported extension
    std::fs::write(preload_dir.path().join("alps.png"), create_test_png(32, 24)).unwrap();
    std::fs::write(
        preload_dir.path().join("lake.jpg"),
        create_test_jpeg(40, 30, 85),
    )
    .unwrap();
    std::fs::write(
        preload_dir.path().join("forest.jpeg"),
        create_test_jpeg(20, 20, 85),
    )
    .unwrap();
    std::fs::write(preload_dir.path().join("broken.png"), b"garbage").unwrap();
    std::fs::write(preload_dir.path().join("readme.txt"), b"ignored").unwrap();

    let store = Arc::new(FsBlobStore::create(storage_dir.path()).unwrap());
    let registry = Arc::new(SlideRegistry::new());
    let pipeline = IngestPipeline::new(
        Transcoder::new(),
        Arc::clone(&store),
        Arc::clone(&registry),
    );

    let count = pipeline.preload(preload_dir.path()).await;
    assert_eq!(count, 3);
    assert_eq!(registry.len().await, 3);

    // Every stored blob is WebP
    for slide in registry.list().await {
        let blob = std::fs::read(store.path(&slide.id)).unwrap();
        assert!(is_valid_webp(&blob), "blob for {} should be WebP", slide.id);
        assert!(slide.title.starts_with("Preloaded: "));
    }

    // Preloaded slides are visible and servable through the router
    let router = create_router(pipeline, RouterConfig::new().with_tracing(false));

    let request = Request::builder()
        .uri("/carousel")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let slides: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(slides.len(), 3);

    let titles: Vec<&str> = slides.iter().map(|s| s["title"].as_str().unwrap()).collect();
    assert!(titles.contains(&"Preloaded: alps"));
    assert!(titles.contains(&"Preloaded: lake"));
    assert!(titles.contains(&"Preloaded: forest"));

    let first_id = slides[0]["id"].as_str().unwrap();
    let request = Request::builder()
        .uri(format!("/serve?id={}", first_id))
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(is_valid_webp(&body));
}

#[tokio::test]
async fn test_preload_absent_directory_yields_empty_carousel() {
    let storage_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FsBlobStore::create(storage_dir.path()).unwrap());
    let registry = Arc::new(SlideRegistry::new());
    let pipeline = IngestPipeline::new(
        Transcoder::new(),
        Arc::clone(&store),
        Arc::clone(&registry),
    );

    let count = pipeline
        .preload(std::path::Path::new("/no/such/preload/dir"))
        .await;
    assert_eq!(count, 0);
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_preload_respects_configured_quality() {
    let storage_dir = tempfile::tempdir().unwrap();
    let preload_dir = tempfile::tempdir().unwrap();
    std::fs::write(preload_dir.path().join("photo.png"), create_test_png(50, 50)).unwrap();

    let store = Arc::new(FsBlobStore::create(storage_dir.path()).unwrap());
    let registry = Arc::new(SlideRegistry::new());
    let pipeline = IngestPipeline::new(
        Transcoder::with_quality(40.0),
        Arc::clone(&store),
        Arc::clone(&registry),
    );

    assert_eq!(pipeline.preload(preload_dir.path()).await, 1);

    let slides = registry.list().await;
    let blob = std::fs::read(store.path(&slides[0].id)).unwrap();
    assert!(is_valid_webp(&blob));
}
