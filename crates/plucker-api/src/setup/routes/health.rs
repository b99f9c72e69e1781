//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub(super) struct RootHealth {
    pub name: String,
    pub path: String,
    pub exists: bool,
}

#[derive(Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub roots: Vec<RootHealth>,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Health check: every root base directory must exist.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut roots = Vec::new();
    for root in state.config.roots().iter() {
        let exists = tokio::fs::metadata(&root.base_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !exists {
            tracing::warn!(root = %root.name, path = %root.base_dir.display(), "Root directory missing");
        }
        roots.push(RootHealth {
            name: root.name.clone(),
            path: root.base_dir.display().to_string(),
            exists,
        });
    }

    let healthy = roots.iter().all(|r| r.exists);
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthCheckResponse {
            status: if healthy { "healthy" } else { "degraded" }.to_string(),
            roots,
        }),
    )
}
