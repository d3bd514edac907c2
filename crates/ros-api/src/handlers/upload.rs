//! Upload handler: the ingress surface in front of the pipeline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;

use ros_core::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::is_acceptable_content_type;

/// Multipart field names accepted for the archive part, in priority order.
const ARCHIVE_FIELD_NAMES: [&str; 2] = ["file", "upload"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub request_id: String,
    pub upload: UploadTenant,
}

#[derive(Debug, Serialize)]
pub struct UploadTenant {
    pub account_number: String,
    pub org_id: String,
}

/// Accept a multipart archive upload and run it through the pipeline.
///
/// The response is 202: the archive was accepted and fully processed, but
/// downstream consumption of the published event happens after this request
/// completes.
pub async fn upload_archive(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let (identity, credential) = state
        .authenticator
        .authenticate(&headers)
        .map_err(ApiError::Unauthorized)?;

    // Reading the body is bounded by the server read timeout.
    let read_timeout = Duration::from_secs(state.config.server.read_timeout_secs);
    let archive = tokio::time::timeout(read_timeout, read_archive_part(&state, &mut multipart))
        .await
        .map_err(|_| ApiError::RequestTimeout {
            limit_secs: state.config.server.read_timeout_secs,
        })??;

    let Some((content_type, payload)) = archive else {
        return Err(ApiError::MissingArchivePart);
    };

    let limit = state.config.upload.max_upload_size;
    if payload.len() as u64 > limit {
        return Err(ApiError::PayloadTooLarge { limit });
    }

    state.metrics.upload_received(&content_type);
    state.metrics.upload_size(&content_type, payload.len() as u64);

    // The write timeout bounds pipeline work; the deadline travels with the
    // context and shrinks upload and publish waits.
    let deadline = Instant::now() + Duration::from_secs(state.config.server.write_timeout_secs);
    let ctx = RequestContext::new(Some(identity), credential).with_deadline(deadline);
    tracing::info!(
        request_id = %ctx.request_id,
        account = %ctx.account_number(),
        org_id = %ctx.org_id(),
        content_type = %content_type,
        size = payload.len(),
        "Accepted upload"
    );

    let result = state.pipeline.run(&ctx, payload).await;
    let outcome = if result.is_ok() { "success" } else { "error" };
    state.metrics.upload_completed(outcome);

    let result = result.map_err(|source| ApiError::Pipeline {
        source,
        request_id: ctx.request_id.clone(),
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(UploadResponse {
            request_id: result.request_id,
            upload: UploadTenant {
                account_number: ctx.account_number().to_string(),
                org_id: ctx.org_id().to_string(),
            },
        }),
    ))
}

/// Walk the multipart fields until the archive part is found, gate its
/// content type, and buffer it.
async fn read_archive_part(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<Option<(String, Bytes)>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidMultipart(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if !ARCHIVE_FIELD_NAMES.contains(&name.as_str()) {
            tracing::debug!(field = %name, "Skipping unrecognized multipart field");
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        if !is_acceptable_content_type(&content_type, &state.config.upload.allowed_content_types) {
            return Err(ApiError::UnsupportedMediaType(content_type));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidMultipart(e.to_string()))?;
        return Ok(Some((content_type, data)));
    }
    Ok(None)
}
