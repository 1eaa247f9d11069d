//! Router assembly.

use std::sync::Arc;

use axum::Router;
use axum::handler::HandlerWithoutStateExt;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use coursegen_llm::TextGenerator;
use coursegen_videos::VideoSearch;

use crate::handlers;
use crate::state::AppState;

/// Build the app router.
///
/// Named routes win; anything else is looked up under `static_dir` and
/// falls through to the 404 page.
pub fn router<G, S>(state: Arc<AppState<G, S>>) -> Router
where
    G: TextGenerator + 'static,
    S: VideoSearch + 'static,
{
    let assets =
        ServeDir::new(&state.static_dir).not_found_service(handlers::not_found.into_service());

    Router::new()
        .route("/", get(handlers::index))
        .route("/submit", post(handlers::submit::<G, S>))
        .route("/health", get(handlers::health::<G, S>))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
