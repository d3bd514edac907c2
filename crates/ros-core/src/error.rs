//! Error types module
//!
//! Every failure the pipeline can surface to a caller is a variant of
//! [`IngressError`]. The taxonomy is deliberately flat: each variant maps to a
//! stable machine-readable reason code and an HTTP status through the
//! [`ErrorMetadata`] trait, so the HTTP layer never inspects error strings.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like bad payloads
    Debug,
    /// Warning level - for recoverable or best-effort failures
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
/// Allows errors to self-describe their HTTP response characteristics.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable reason code (e.g., "MANIFEST_NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether this error aborts the request
    fn is_fatal(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum IngressError {
    #[error("Archive extraction failed: {0}")]
    Extraction(String),

    #[error("manifest.json not found in payload")]
    ManifestNotFound,

    #[error("Failed to parse manifest: {0}")]
    ManifestParse(String),

    #[error("Invalid manifest: {0}")]
    ManifestValidation(String),

    #[error("No resource optimization files found in payload")]
    NoSelectedFiles,

    #[error("Failed to upload file {file}: {reason}")]
    Upload { file: String, reason: String },

    #[error("Event delivery failed: {0}")]
    Delivery(String),

    #[error("Event delivery timed out: {0}")]
    DeliveryTimeout(String),

    #[error("Validation event delivery failed: {0}")]
    ValidationDelivery(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for IngressError {
    fn from(err: serde_json::Error) -> Self {
        IngressError::ManifestParse(err.to_string())
    }
}

/// Static metadata per variant: (http_status, reason_code, fatal, log_level).
fn static_metadata(err: &IngressError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        IngressError::Extraction(_) => (500, "EXTRACTION_FAILED", true, LogLevel::Warn),
        IngressError::ManifestNotFound => (500, "MANIFEST_NOT_FOUND", true, LogLevel::Warn),
        IngressError::ManifestParse(_) => (500, "MANIFEST_PARSE_FAILED", true, LogLevel::Warn),
        IngressError::ManifestValidation(_) => {
            (500, "MANIFEST_VALIDATION_FAILED", true, LogLevel::Warn)
        }
        IngressError::NoSelectedFiles => (500, "NO_ROS_FILES", true, LogLevel::Debug),
        IngressError::Upload { .. } => (500, "UPLOAD_FAILED", true, LogLevel::Error),
        IngressError::Delivery(_) => (500, "EVENT_DELIVERY_FAILED", true, LogLevel::Error),
        IngressError::DeliveryTimeout(_) => (500, "EVENT_DELIVERY_TIMEOUT", true, LogLevel::Error),
        IngressError::ValidationDelivery(_) => {
            (500, "VALIDATION_DELIVERY_FAILED", false, LogLevel::Warn)
        }
        IngressError::Io(_) => (500, "IO_ERROR", true, LogLevel::Error),
    }
}

impl ErrorMetadata for IngressError {
    fn http_status_code(&self) -> u16 {
        static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        static_metadata(self).1
    }

    fn is_fatal(&self) -> bool {
        static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        static_metadata(self).3
    }
}
