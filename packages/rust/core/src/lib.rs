//! Core pipeline orchestration for CourseGen.
//!
//! This crate ties together text generation, heading extraction, and video
//! enrichment into the end-to-end `build_course` workflow, and renders the
//! generated document to HTML.

pub mod enrichment;
pub mod pipeline;
pub mod render;

pub use enrichment::{MAX_ENRICHED_MODULES, MIN_QUERY_LEN, VideoLookup, derive_query, enrich};
pub use pipeline::{PipelineOptions, ProgressReporter, SilentProgress, build_course};
pub use render::{escape_html, render_markdown};

#[cfg(test)]
pub(crate) mod testing;
