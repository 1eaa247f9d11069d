//! Server lifecycle: bind, serve, shut down.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use coursegen_llm::TextGenerator;
use coursegen_shared::{CourseGenError, Result};
use coursegen_videos::VideoSearch;

use crate::router::router;
use crate::state::AppState;

/// Bind `addr`, returning the listener and the address actually bound.
pub async fn bind(addr: SocketAddr) -> Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| CourseGenError::Network(format!("failed to bind {addr}: {e}")))?;
    let local = listener
        .local_addr()
        .map_err(|e| CourseGenError::Network(format!("failed to read bound address: {e}")))?;
    Ok((listener, local))
}

/// Serve on `addr` until Ctrl-C.
pub async fn serve<G, S>(state: Arc<AppState<G, S>>, addr: SocketAddr) -> Result<()>
where
    G: TextGenerator + 'static,
    S: VideoSearch + 'static,
{
    let (listener, _) = bind(addr).await?;

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
        }
    };

    serve_with_shutdown(listener, state, ctrl_c).await
}

/// Serve on an already-bound listener until `signal` completes, then drain.
pub async fn serve_with_shutdown<G, S, F>(
    listener: TcpListener,
    state: Arc<AppState<G, S>>,
    signal: F,
) -> Result<()>
where
    G: TextGenerator + 'static,
    S: VideoSearch + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map_err(|e| CourseGenError::Network(format!("failed to read bound address: {e}")))?;
    tracing::info!(%addr, static_dir = %state.static_dir.display(), "CourseGen listening");

    let shutdown = async move {
        signal.await;
        tracing::info!("shutdown signal received");
    };

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| CourseGenError::Network(format!("server error: {e}")))?;

    tracing::info!(%addr, "server stopped");
    Ok(())
}
