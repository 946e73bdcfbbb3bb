//! Sensors Web Service - Main Entry Point

use api::{init_logging, run_server, ServiceConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = ServiceConfig::load()?;
    info!("=== sensors web service v{} ===", env!("CARGO_PKG_VERSION"));

    run_server(config).await
}
