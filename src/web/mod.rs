//! HTTP/JSON API over the posts table.

pub mod envelope;
pub mod error;
mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::db::Database;
use envelope::Envelope;

/// Path prefix of the board resource.
pub const BOARD_PREFIX: &str = "/api/board";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Start the API server and run until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener cannot be bound.
pub async fn serve(state: AppState, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.web_host, state.config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    info!(addr = %addr, "Board API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).fallback(not_found))
        .route("/healthz", get(health).fallback(not_found))
        .nest(BOARD_PREFIX, routes::router())
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Board API server is running.",
        "endpoints": {
            "GET /api/board": "List all posts",
            "GET /api/board/page?page=&keyword=": "List one page of posts, optionally filtered by title",
            "GET /api/board/:id": "Get a post",
            "POST /api/board": "Create a post",
            "PUT /api/board/:id": "Update a post",
            "DELETE /api/board/:id": "Delete a post"
        }
    }))
}

async fn health() -> &'static str {
    "ok"
}

/// JSON 404 for unknown paths and for methods a path does not serve.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(Envelope::failure("The requested path was not found.")),
    )
}
