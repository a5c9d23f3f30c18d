use thiserror::Error;

/// Errors that can occur while transcoding an uploaded image to WebP.
///
/// Both variants are non-retryable for the same input: resubmitting
/// unmodified bytes will fail the same way.
#[derive(Debug, Clone, Error)]
pub enum TranscodeError {
    /// The buffer could not be parsed as any supported raster format
    #[error("Image decode failed: {0}")]
    Decode(String),

    /// Re-encoding the decoded raster to WebP failed
    #[error("WebP encode failed: {0}")]
    Encode(String),
}

/// Errors from the blob store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Writing the encoded bytes to disk failed
    #[error("Failed to write blob {id}: {message}")]
    Write { id: String, message: String },

    /// Reading a stored blob failed for a reason other than absence
    #[error("Failed to read blob {id}: {message}")]
    Read { id: String, message: String },

    /// No blob exists for the given id
    #[error("Blob not found: {0}")]
    NotFound(String),
}

/// Errors from the ingestion pipeline.
///
/// The pipeline is all-or-nothing with respect to the registry: any error
/// here means no slide was registered and no blob remains from the attempt.
#[derive(Debug, Clone, Error)]
pub enum IngestError {
    /// The request carried no image bytes (checked before transcoding)
    #[error("No image uploaded or referenced")]
    NoImage,

    /// Transcoding failed
    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    /// Persisting the encoded blob failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
