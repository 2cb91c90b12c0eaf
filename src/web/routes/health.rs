//! Health Routes
//!
//! - GET /health/live - Liveness (process is alive)
//! - GET /health - Full health status, including the backend

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::web::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    /// Open server-side sessions
    pub sessions: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (status, backend) = match state.backend.health_check().await {
        Ok(()) => ("healthy", "ok".to_string()),
        Err(e) => {
            tracing::warn!(backend = %state.backend.name(), error = %e, "Backend health check failed");
            ("degraded", format!("error: {}", e))
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        backend,
        sessions: state.sessions.hub().len().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
