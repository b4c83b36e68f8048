use anyhow::{Context, Result};
use tracing::{error, info};

use spread_board::client::BoardClient;
use spread_board::config::Config;
use spread_board::frontend::{self, FrontendState};
use spread_board::logging::init_tracing;
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

    info!("Starting board-web");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    if config.spreadsheet_script_url.is_none() {
        info!("SPREADSHEET_SCRIPT_URL not set; spreadsheet editing is limited to CSV import");
    }

    let client = BoardClient::from_config(&config).context("Failed to build API client")?;
    let state = FrontendState::new(client, config);

    frontend::serve(state, shutdown::signal()).await?;

    info!("Shutdown complete");
    Ok(())
}
