//! In-memory slide registry.
//!
//! The registry is the single source of slide metadata: a concurrency-safe
//! `id -> Slide` map guarded by one readers-writer lock. It is
//! process-lifetime state; nothing is persisted across restarts.
//!
//! `list()` returns a snapshot taken under the read lock, so a concurrent
//! insert or delete is either fully visible in the snapshot or not at all.
//! Enumeration order is unspecified and may differ between calls.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::slide::Slide;

/// Concurrency-safe mapping from slide id to slide metadata.
#[derive(Debug, Default)]
pub struct SlideRegistry {
    slides: RwLock<HashMap<String, Slide>>,
}

impl SlideRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            slides: RwLock::new(HashMap::new()),
        }
    }

    /// Add or replace the entry keyed by `slide.id`.
    ///
    /// Slides with an empty id are ignored; ids are generated by the
    /// ingestion pipeline so this does not happen in normal operation.
    pub async fn insert(&self, slide: Slide) {
        if slide.id.is_empty() {
            return;
        }
        let mut slides = self.slides.write().await;
        slides.insert(slide.id.clone(), slide);
    }

    /// Remove the entry for `id` if present; returns whether it existed.
    ///
    /// Absence is not an error here. Callers decide whether a missing id
    /// matters (the serving layer maps it to a 404).
    pub async fn delete(&self, id: &str) -> bool {
        let mut slides = self.slides.write().await;
        slides.remove(id).is_some()
    }

    /// Fetch the slide for `id`, if registered.
    pub async fn get(&self, id: &str) -> Option<Slide> {
        let slides = self.slides.read().await;
        slides.get(id).cloned()
    }

    /// Snapshot of all current entries, in unspecified order.
    pub async fn list(&self) -> Vec<Slide> {
        let slides = self.slides.read().await;
        slides.values().cloned().collect()
    }

    /// Number of registered slides.
    pub async fn len(&self) -> usize {
        let slides = self.slides.read().await;
        slides.len()
    }

    /// Whether the registry has no entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

// =============================================================================
// Tests
// =============================================================================
