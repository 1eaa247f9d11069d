//! Shared state handed to every request.

use std::path::PathBuf;
use std::sync::Arc;

use coursegen_core::PipelineOptions;
use coursegen_llm::TextGenerator;
use coursegen_shared::{AppConfig, ValidationConfig};
use coursegen_videos::VideoSearch;

/// Process-wide services and settings. Built once at startup and shared via `Arc`.
pub struct AppState<G, S> {
    pub generator: G,
    /// `None` when no video-search credential is configured.
    pub search: Option<S>,
    pub validation: ValidationConfig,
    pub pipeline: PipelineOptions,
    pub static_dir: PathBuf,
}

impl<G: TextGenerator, S: VideoSearch> AppState<G, S> {
    /// Assemble state from the loaded config and already-built clients.
    pub fn new(config: &AppConfig, generator: G, search: Option<S>) -> Arc<Self> {
        Arc::new(Self {
            generator,
            search,
            validation: config.validation.clone(),
            pipeline: PipelineOptions::from(&config.pipeline),
            static_dir: PathBuf::from(&config.server.static_dir),
        })
    }

    /// Whether video enrichment will be attempted.
    pub fn video_search_enabled(&self) -> bool {
        self.search.is_some()
    }
}
