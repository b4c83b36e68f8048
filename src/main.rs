use anyhow::{Context, Result};
use tracing::{error, info};

use spread_board::config::Config;
use spread_board::db::Database;
use spread_board::logging::init_tracing;
use spread_board::web::{self, AppState};
use spread_board::shutdown;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing("info,spread_board=debug")?;

    info!("Starting board-server");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    if let Some(parent) = config.database_path.parent() {
        tokio::fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }

    // No degraded mode: an unreachable database stops the process here.
    let db = Database::new(&config.database_path, &config.pool_settings())
        .await
        .context("Failed to initialize database")?;

    let state = AppState::new(db.clone(), config);
    let served = web::serve(state, shutdown::signal()).await;

    info!("Shutting down...");
    db.close().await;
    info!("Shutdown complete");

    served
}
