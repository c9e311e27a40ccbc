//! Enrollview API Server
//!
//! Run with: cargo run --bin enrollview-api
//!
//! # Configuration
//!
//! Reads `config.toml` from the standard locations (see `Config::load_default`),
//! or the file named by `ENROLLVIEW_CONFIG`. Environment variables:
//! - `ENROLLVIEW_DATASET_PATH`: Default dataset file (default: "Education Dataset (1).xlsx")
//! - `ENROLLVIEW_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `ENROLLVIEW_API_PORT`: Port to listen on (default: 8501)
//! - `ENROLLVIEW_LOG_LEVEL`: Log level (default: info)
//! - `ENROLLVIEW_LOG_FORMAT`: pretty or json (default: pretty)
//! - `RUST_LOG`: Full filter directives, overrides the log level

use enrollview::api::{serve, AppState};
use enrollview::config::Config;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = enrollview::logging::with_bootstrap(|| {
        match std::env::var_os("ENROLLVIEW_CONFIG") {
            Some(path) => Config::load_with_env(&PathBuf::from(path)),
            None => Ok(Config::load_default()),
        }
    })?;

    enrollview::logging::init(&config.logging)?;

    tracing::info!("Starting Enrollview API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Default dataset: {}", config.dataset.default_path.display());
    tracing::info!(
        "Focus regions: {}",
        config
            .regions
            .focus
            .iter()
            .map(|r| r.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let state = AppState::new(&config);

    // Warm the cache
    match state.load_active().await {
        Ok((source, dataset)) => {
            tracing::info!("Loaded {} records from {}", dataset.len(), source)
        }
        Err(e) => tracing::warn!("Default dataset not available yet: {}", e),
    }

    serve(state).await?;

    tracing::info!("Enrollview API server stopped");
    Ok(())
}
