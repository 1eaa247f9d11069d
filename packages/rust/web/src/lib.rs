//! HTTP front end for CourseGen.
//!
//! A small axum app: a form page at `/`, course generation at `/submit`,
//! a JSON health check, and static assets served from disk.

pub mod error;
pub mod handlers;
pub mod page;
pub mod router;
pub mod server;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use error::WebError;
pub use page::{PLACEHOLDER, PageView, render_page};
pub use router::router;
pub use server::{bind, serve, serve_with_shutdown};
pub use state::AppState;
