//! Error types for CourseGen.
//!
//! Library crates use [`CourseGenError`] via `thiserror`.
//! App crates (cli/web) wrap this with `color-eyre` or map it to HTTP responses.

use std::path::PathBuf;

/// Top-level error type for all CourseGen operations.
#[derive(Debug, thiserror::Error)]
pub enum CourseGenError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while talking to a hosted service.
    #[error("network error: {0}")]
    Network(String),

    /// Text generation failed or returned unusable output.
    #[error("generation error: {0}")]
    Generation(String),

    /// Video search failed for a single query.
    #[error("enrichment error: {0}")]
    Enrichment(String),

    /// Opaque pipeline failure surfaced to end users.
    ///
    /// The detailed cause is logged where it happens and never carried here.
    #[error("failed to generate course, please try again")]
    CourseGeneration,

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input validation error (topic too short, denylisted, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CourseGenError>;

impl CourseGenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The user-facing message when this error came from input validation.
    pub fn validation_message(&self) -> Option<&str> {
        match self {
            Self::Validation { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = CourseGenError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = CourseGenError::validation("topic is too short");
        assert!(err.to_string().contains("too short"));
        assert_eq!(err.validation_message(), Some("topic is too short"));
    }

    #[test]
    fn course_generation_is_opaque() {
        let err = CourseGenError::CourseGeneration;
        assert_eq!(err.to_string(), "failed to generate course, please try again");
        assert_eq!(err.validation_message(), None);
    }
}
