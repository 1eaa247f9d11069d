//! Route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, State};
use axum::http::Uri;
use axum::response::Html;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use coursegen_core::{SilentProgress, build_course};
use coursegen_llm::TextGenerator;
use coursegen_shared::Topic;
use coursegen_videos::VideoSearch;

use crate::error::WebError;
use crate::page::{PageView, render_page};
use crate::state::AppState;

/// Body of `POST /submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub video_search: bool,
}

/// `GET /`: the form with placeholder output.
pub async fn index() -> Html<String> {
    Html(render_page(&PageView::landing()))
}

/// `POST /submit`: validate the topic, run the pipeline, render the course.
pub async fn submit<G, S>(
    State(state): State<Arc<AppState<G, S>>>,
    Form(form): Form<SubmitForm>,
) -> Result<Html<String>, WebError>
where
    G: TextGenerator + 'static,
    S: VideoSearch + 'static,
{
    let span = info_span!("submit", request_id = %Uuid::now_v7());

    async move {
        let raw = form.topic.unwrap_or_default();
        if raw.trim().is_empty() {
            return Err(WebError::MissingTopic);
        }

        let topic = Topic::parse(&raw, &state.validation).map_err(|e| {
            debug!(error = %e, "topic rejected");
            WebError::from_core(raw.trim(), e)
        })?;
        info!(%topic, "course requested");

        let result = build_course(
            &state.generator,
            state.search.as_ref(),
            &topic,
            &state.pipeline,
            &SilentProgress,
        )
        .await
        .map_err(|e| WebError::from_core(topic.as_str(), e))?;

        Ok(Html(render_page(&PageView::course(&result))))
    }
    .instrument(span)
    .await
}

/// `GET /health`: liveness plus whether video search is configured.
pub async fn health<G, S>(State(state): State<Arc<AppState<G, S>>>) -> Json<HealthResponse>
where
    G: TextGenerator + 'static,
    S: VideoSearch + 'static,
{
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        video_search: state.video_search_enabled(),
    })
}

/// Fallback for paths with no route and no static file.
pub async fn not_found(uri: Uri) -> WebError {
    WebError::NotFound(uri.path().to_string())
}
