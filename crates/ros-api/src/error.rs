//! HTTP error response conversion.
//!
//! Pipeline errors carry their own presentation metadata; request-level
//! rejections (bad multipart, unacceptable content type, auth) are defined
//! here. Both render the same JSON error shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ros_core::{ErrorMetadata, IngressError, LogLevel};
use serde::Serialize;

use crate::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable reason code for programmatic handling.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Pipeline {
        source: IngressError,
        request_id: String,
    },
    Unauthorized(AuthError),
    UnsupportedMediaType(String),
    PayloadTooLarge {
        limit: u64,
    },
    RequestTimeout {
        limit_secs: u64,
    },
    MissingArchivePart,
    InvalidMultipart(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Pipeline { source, .. } => {
                StatusCode::from_u16(source.http_status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RequestTimeout { .. } => StatusCode::REQUEST_TIMEOUT,
            ApiError::MissingArchivePart | ApiError::InvalidMultipart(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Pipeline { source, .. } => source.error_code(),
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            ApiError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            ApiError::RequestTimeout { .. } => "REQUEST_TIMEOUT",
            ApiError::MissingArchivePart => "MISSING_ARCHIVE_PART",
            ApiError::InvalidMultipart(_) => "INVALID_MULTIPART",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Pipeline { source, .. } => source.to_string(),
            ApiError::Unauthorized(e) => e.to_string(),
            ApiError::UnsupportedMediaType(ct) => {
                format!("unsupported content type: {}", ct)
            }
            ApiError::PayloadTooLarge { limit } => {
                format!("payload exceeds the {} byte limit", limit)
            }
            ApiError::RequestTimeout { limit_secs } => {
                format!("request body not received within {} seconds", limit_secs)
            }
            ApiError::MissingArchivePart => {
                "multipart request carries no archive part".to_string()
            }
            ApiError::InvalidMultipart(reason) => {
                format!("invalid multipart request: {}", reason)
            }
        }
    }

    fn request_id(&self) -> Option<&str> {
        match self {
            ApiError::Pipeline { request_id, .. } => Some(request_id),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        match &self {
            ApiError::Pipeline { source, request_id } => match source.log_level() {
                LogLevel::Debug => {
                    tracing::debug!(request_id = %request_id, code = self.code(), error = %source, "Request failed")
                }
                LogLevel::Warn => {
                    tracing::warn!(request_id = %request_id, code = self.code(), error = %source, "Request failed")
                }
                LogLevel::Error => {
                    tracing::error!(request_id = %request_id, code = self.code(), error = %source, "Request failed")
                }
            },
            other => {
                tracing::debug!(code = other.code(), error = %message, "Request rejected")
            }
        }

        let body = ErrorResponse {
            error: message,
            code: self.code().to_string(),
            request_id: self.request_id().map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}
