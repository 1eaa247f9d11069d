//! Request errors and their HTTP responses.
//!
//! Form errors render the page again with a banner, so the user keeps the
//! form. Only the missing-topic case answers with a bare text body.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use coursegen_shared::CourseGenError;

use crate::page::{PageView, render_page};

/// Body returned when the form carries no topic at all.
pub const MISSING_TOPIC: &str = "Topic is missing.";

/// Web-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("topic is missing")]
    MissingTopic,
    #[error("invalid topic: {message}")]
    InvalidTopic { topic: String, message: String },
    #[error("course generation failed")]
    Generation { topic: String },
    #[error("not found: {0}")]
    NotFound(String),
}

impl WebError {
    /// Map a core error for the submitted `topic`.
    ///
    /// Validation keeps its message. Everything else is reported with the
    /// opaque generation message; the cause was already logged upstream.
    pub fn from_core(topic: &str, err: CourseGenError) -> Self {
        match err.validation_message() {
            Some(message) => Self::InvalidTopic {
                topic: topic.to_string(),
                message: message.to_string(),
            },
            None => Self::Generation {
                topic: topic.to_string(),
            },
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::MissingTopic => (StatusCode::BAD_REQUEST, MISSING_TOPIC).into_response(),
            WebError::InvalidTopic { topic, message } => {
                let html = render_page(&PageView::error(Some(&topic), &message));
                (StatusCode::BAD_REQUEST, Html(html)).into_response()
            }
            WebError::Generation { topic } => {
                let message = CourseGenError::CourseGeneration.to_string();
                let html = render_page(&PageView::error(Some(&topic), &message));
                (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
            }
            WebError::NotFound(path) => {
                tracing::debug!(%path, "no route or static file");
                let html = render_page(&PageView::error(None, "Page not found."));
                (StatusCode::NOT_FOUND, Html(html)).into_response()
            }
        }
    }
}
