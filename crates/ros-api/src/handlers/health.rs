use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub storage: &'static str,
    pub broker: &'static str,
}

/// Liveness probe. Process-up only; dependency state belongs to readiness.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "ros-ingress",
    })
}

/// Readiness probe: both the storage backend and the broker must answer.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let storage_ok = match state.storage.check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Storage readiness check failed");
            false
        }
    };
    let broker_ok = match state.publisher.check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Broker readiness check failed");
            false
        }
    };

    let ready = storage_ok && broker_ok;
    let response = ReadinessResponse {
        status: if ready { "ready" } else { "not ready" },
        storage: if storage_ok { "ok" } else { "unavailable" },
        broker: if broker_ok { "ok" } else { "unavailable" },
    };
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
