//! Local filesystem blob store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::StoreError;
use crate::transcode::CANONICAL_EXT;

use super::BlobStore;

/// Blob store backed by a flat directory of `<id>.webp` files.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    base_dir: PathBuf,
}

impl FsBlobStore {
    /// Create the store, creating the base directory (and parents) if absent.
    ///
    /// Callers treat a failure here as fatal at startup.
    pub fn create(base_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// The base directory blobs are stored under.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn write(&self, id: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path(id);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StoreError::Write {
                id: id.to_string(),
                message: e.to_string(),
            })?;
        debug!(id = id, path = %path.display(), size = bytes.len(), "Blob written");
        Ok(())
    }

    async fn open(&self, id: &str) -> Result<Bytes, StoreError> {
        let path = self.path(id);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id.to_string())),
            Err(e) => Err(StoreError::Read {
                id: id.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn path(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{}.{}", id, CANONICAL_EXT))
    }
}

// =============================================================================
// Tests
// =============================================================================
