//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use plucker_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    plucker_infra::init_telemetry(&config.environment)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    config
        .validate()
        .context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    log_roots(&config).await;

    let state = Arc::new(AppState::new(config.clone()).context("Failed to build services")?);
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Missing root directories are reported but not fatal; requests against them
/// answer "Directory not found" until they appear.
async fn log_roots(config: &Config) {
    for root in config.roots().iter() {
        let exists = tokio::fs::try_exists(&root.base_dir).await.unwrap_or(false);
        if exists {
            tracing::info!(root = %root.name, path = %root.base_dir.display(), "Root configured");
        } else {
            tracing::warn!(root = %root.name, path = %root.base_dir.display(), "Root directory does not exist");
        }
    }
}
