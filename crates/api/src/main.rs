//! Antenatal Screening Service - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    init_logging(&settings.logging).context("Failed to initialize logging")?;

    info!("=== Antenatal Screening Service v{} ===", env!("CARGO_PKG_VERSION"));

    run_server(settings).await.context("Server terminated")?;

    Ok(())
}
