//! Service banner and health endpoints, mounted outside `/api/v1`.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use super::{AppState, HealthResponse, RootResponse};

#[derive(Debug, Serialize)]
pub struct HealthReadinessChecks {
    pub database: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthReadyResponse {
    pub ready: bool,
    pub checks: HealthReadinessChecks,
}

/// `GET /`
pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    let config = state.config();
    Json(RootResponse {
        message: config.api.title.clone(),
        version: config.api.version.clone(),
        status: "running",
    })
}

/// `GET /health`. Liveness only; never touches the store.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// `GET /health/ready`. 503 when the store does not answer.
pub async fn health_ready(State(state): State<Arc<AppState>>) -> Response {
    let database = match state.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            false
        }
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthReadyResponse {
            ready: database,
            checks: HealthReadinessChecks { database },
        }),
    )
        .into_response()
}
