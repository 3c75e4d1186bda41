//! HTTP server for Wayline (axum).
//!
//! Listens on `127.0.0.1:8080` by default and exposes graph creation, runs,
//! run polling, the tool catalog and the built-in code-review workflow.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`AppState`], [`router`].

mod app;
mod error;
mod graphs;
mod tools;
mod workflow;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

pub use app::{router, AppState, GraphInfo};
pub use error::ApiError;

/// Serves on an existing listener. Tests bind `127.0.0.1:0` and pass the listener in.
pub async fn run_serve_on_listener(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("wayline server listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Binds `addr` (default from [`config::Settings`]) and serves until the process exits.
pub async fn run_serve(
    addr: Option<&str>,
    settings: config::Settings,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = addr.unwrap_or(settings.addr.as_str()).to_string();
    let state = Arc::new(AppState::new(settings)?);
    let listener = TcpListener::bind(&addr).await?;
    run_serve_on_listener(listener, state).await
}
