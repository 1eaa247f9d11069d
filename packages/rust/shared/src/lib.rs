//! Shared types, error model, and configuration for CourseGen.
//!
//! This crate is the foundation depended on by all other CourseGen crates.
//! It provides:
//! - [`CourseGenError`], the unified error type
//! - Domain types ([`Topic`], [`CourseDocument`], [`ModuleHeading`],
//!   [`VideoDescriptor`], [`CourseResult`])
//! - Configuration ([`AppConfig`], [`Credentials`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, Credentials, OpenAiConfig, PipelineConfig, ServerConfig, ValidationConfig,
    YouTubeConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
    resolve_credentials, resolve_credentials_with,
};
pub use error::{CourseGenError, Result};
pub use types::{CourseDocument, CourseResult, ModuleHeading, ModuleVideos, Topic, VideoDescriptor};
