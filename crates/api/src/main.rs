//! Variant Predictor - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Variant Predictor v{} ===", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().context("loading configuration")?;
    info!(
        model = %config.model_path.display(),
        table = %config.table_path.display(),
        "resolved configuration"
    );

    run_server(config)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    Ok(())
}
