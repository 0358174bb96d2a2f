//! Liveness and readiness probes

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub checks: ReadyChecks,
}

#[derive(Serialize)]
pub struct ReadyChecks {
    pub database: DependencyStatus,
}

#[derive(Serialize)]
pub struct DependencyStatus {
    pub status: &'static str,
}

/// Always healthy while the process is serving
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Ready once the database answers a ping
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let database_up = match state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            false
        }
    };

    Json(ReadyResponse {
        status: if database_up { "ready" } else { "not_ready" },
        checks: ReadyChecks {
            database: DependencyStatus {
                status: if database_up { "up" } else { "down" },
            },
        },
    })
}
