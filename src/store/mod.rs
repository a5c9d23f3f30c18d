//! Blob storage layer.
//!
//! Encoded images are persisted as flat files named `<id>.webp` under a base
//! directory. The [`BlobStore`] trait abstracts the backend so the rest of
//! the service never touches the filesystem directly; only the local
//! filesystem implementation exists today (the `STORAGE_BACKEND` selector is
//! read at startup for future extensibility).
//!
//! There is deliberately no delete operation: removing a slide from the
//! registry leaves its blob on disk. See the serving layer for how a missing
//! blob is reported.

mod fs;

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

pub use fs::FsBlobStore;

/// Storage backend for encoded image blobs.
///
/// Implementations must be safe for concurrent use; each call is an
/// independent operation with no shared in-memory state required.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Persist encoded bytes under the given id, overwriting any existing
    /// blob with the same id (ids are unique by construction, so overwrite
    /// is not expected in practice).
    async fn write(&self, id: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Read the blob stored under the given id.
    ///
    /// Returns [`StoreError::NotFound`] if no blob exists for the id.
    async fn open(&self, id: &str) -> Result<Bytes, StoreError>;

    /// The location a blob with this id is (or would be) stored at.
    fn path(&self, id: &str) -> PathBuf;
}
