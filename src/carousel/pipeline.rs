//! Image ingestion pipeline.
//!
//! One procedure serves both entry points (HTTP uploads and the startup
//! preload): transcode the bytes, persist the blob, register the slide.
//! Ordering matters: the registry insert happens last, so a failed
//! transcode or write never produces a dangling registry entry.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use metrics::counter;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::IngestError;
use crate::store::BlobStore;
use crate::transcode::{SourceFormat, Transcoder};

use super::registry::SlideRegistry;
use super::slide::Slide;

/// Title prefix applied to slides created by the startup preload.
pub const PRELOAD_TITLE_PREFIX: &str = "Preloaded: ";

/// Orchestrates transcoder, blob store, and registry for image ingestion.
pub struct IngestPipeline<B: BlobStore> {
    transcoder: Transcoder,
    store: Arc<B>,
    registry: Arc<SlideRegistry>,
}

impl<B: BlobStore> IngestPipeline<B> {
    /// Create a pipeline over the given store and registry.
    pub fn new(transcoder: Transcoder, store: Arc<B>, registry: Arc<SlideRegistry>) -> Self {
        Self {
            transcoder,
            store,
            registry,
        }
    }

    /// The registry this pipeline inserts into.
    pub fn registry(&self) -> &Arc<SlideRegistry> {
        &self.registry
    }

    /// The blob store this pipeline writes to.
    pub fn store(&self) -> &Arc<B> {
        &self.store
    }

    /// Ingest one image: transcode, store, register, return the new slide.
    ///
    /// `image` being `None` or empty short-circuits with
    /// [`IngestError::NoImage`] before any transcode attempt. Any later
    /// failure propagates without registering anything.
    pub async fn ingest(
        &self,
        image: Option<Bytes>,
        title: &str,
        source_url: &str,
    ) -> Result<Slide, IngestError> {
        let data = match image {
            Some(data) if !data.is_empty() => data,
            _ => return Err(IngestError::NoImage),
        };

        let id = Uuid::new_v4().to_string();

        let output = self.transcoder.transcode(&data)?;
        debug!(
            id = %id,
            source_format = output.source_format.name(),
            width = output.width,
            height = output.height,
            encoded_bytes = output.data.len(),
            "Image transcoded"
        );

        self.store.write(&id, &output.data).await?;

        let slide = Slide::new(id, title, source_url);
        self.registry.insert(slide.clone()).await;

        counter!("carousel_slides_ingested_total").increment(1);
        info!(id = %slide.id, title = %slide.title, url = %slide.image_url, "Slide added");

        Ok(slide)
    }

    /// Scan `dir` once (non-recursively) and ingest every file whose
    /// extension matches a supported raster format.
    ///
    /// Per-file failures are logged and skipped; they never abort the scan.
    /// An absent or unreadable directory is logged and yields zero entries.
    /// Returns the number of slides registered.
    pub async fn preload(&self, dir: &Path) -> usize {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not read preload dir {}: {}", dir.display(), e);
                return 0;
            }
        };

        let mut count = 0usize;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!("Error scanning preload dir {}: {}", dir.display(), e);
                    break;
                }
            };

            let path = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => continue,
                Ok(_) => {}
                Err(e) => {
                    warn!("Preload: could not stat {}: {}", path.display(), e);
                    continue;
                }
            }
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if SourceFormat::from_extension(ext).is_none() {
                continue;
            }

            let data = match tokio::fs::read(&path).await {
                Ok(data) => data,
                Err(e) => {
                    warn!("Preload: failed to read {}: {}", path.display(), e);
                    continue;
                }
            };

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            let title = format!("{}{}", PRELOAD_TITLE_PREFIX, stem);

            match self.ingest(Some(Bytes::from(data)), &title, "").await {
                Ok(slide) => {
                    info!(
                        "Preload: added {} as slide {}",
                        path.display(),
                        slide.id
                    );
                    count += 1;
                }
                Err(e) => {
                    warn!("Preload: skipping {}: {}", path.display(), e);
                }
            }
        }

        info!("Preload complete: {} image(s) loaded from {}", count, dir.display());
        count
    }
}

// =============================================================================
// Tests
// =============================================================================
