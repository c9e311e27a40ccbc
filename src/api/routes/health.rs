//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (active dataset loads)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the active dataset can be loaded.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if dataset_available(&state).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let dataset_ok = dataset_available(&state).await;
    let (status, dataset) = if dataset_ok {
        ("healthy", "ok")
    } else {
        ("degraded", "unavailable")
    };

    Json(HealthResponse {
        status: status.to_string(),
        dataset: dataset.to_string(),
        source: state.active_source().await.to_string(),
        started_at: state.started_at,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn dataset_available(state: &AppState) -> bool {
    match state.load_active().await {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!("Dataset not available: {}", e);
            false
        }
    }
}
