//! Slide metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One carousel entry: metadata plus a reference to its stored image.
///
/// The image bytes themselves live in the blob store; a slide only carries
/// the derived URL clients fetch them from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Unique identifier, generated by the service and immutable
    pub id: String,

    /// URL the stored image is served from (`/serve?id=<id>`)
    pub image_url: String,

    /// Free-text label, defaults to empty
    #[serde(default)]
    pub title: String,

    /// Free-text attribution link, defaults to empty
    #[serde(default)]
    pub source_url: String,

    /// UTC timestamp set when the slide was created
    pub created_at: DateTime<Utc>,
}

impl Slide {
    /// Build a slide for a freshly ingested image.
    ///
    /// `image_url` is derived from the id and `created_at` is set to now.
    pub fn new(id: impl Into<String>, title: impl Into<String>, source_url: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            image_url: serve_url(&id),
            id,
            title: title.into(),
            source_url: source_url.into(),
            created_at: Utc::now(),
        }
    }
}

/// The URL a stored image is fetched from.
pub fn serve_url(id: &str) -> String {
    format!("/serve?id={}", id)
}
