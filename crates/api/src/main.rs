//! Water Dashboard - Main Entry Point

use api::{init_logging, run_server, DashboardConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::load()?;
    init_logging(config.log_json)?;

    info!("=== Smart Water Dashboard v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {}", config.data_dir.display());

    run_server(config).await
}
