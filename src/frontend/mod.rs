//! Server-rendered board UI.
//!
//! Every page is built from data fetched through [`BoardClient`]; the frontend
//! holds no state of its own.

pub mod pages;
mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::client::BoardClient;
use crate::config::Config;

#[derive(Clone)]
pub struct FrontendState {
    pub client: BoardClient,
    pub config: Arc<Config>,
}

impl FrontendState {
    #[must_use]
    pub fn new(client: BoardClient, config: Config) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

/// Start the frontend server and run until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener cannot be bound.
pub async fn serve(
    state: FrontendState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        state.config.frontend_host, state.config.frontend_port
    )
    .parse()
    .context("Invalid frontend server address")?;
    let api = state.config.api_base_url.clone();

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind frontend server")?;

    info!(addr = %addr, api = %api, "Board frontend listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Frontend server error")?;

    Ok(())
}

/// Create the frontend router.
pub fn create_app(state: FrontendState) -> Router {
    routes::router()
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
