//! Route configuration.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::health::{health_check, readiness_check};
use crate::handlers::upload::upload_archive;
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/ingress/v1";

pub fn build_router(state: Arc<AppState>) -> Router {
    // Allow some headroom over the archive limit for multipart framing; the
    // handler enforces the exact archive size itself.
    let body_limit = state.config.upload.max_upload_size as usize + 64 * 1024;

    Router::new()
        .route(&format!("{}/upload", API_PREFIX), post(upload_archive))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}
