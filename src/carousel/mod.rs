//! Carousel domain: slide metadata, the in-memory registry, and the
//! ingestion pipeline that ties transcoding and storage together.

pub mod pipeline;
pub mod registry;
pub mod slide;

pub use pipeline::{IngestPipeline, PRELOAD_TITLE_PREFIX};
pub use registry::SlideRegistry;
pub use slide::{serve_url, Slide};
