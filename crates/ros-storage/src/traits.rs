//! Storage abstraction trait
//!
//! This module defines the Storage capability that the uploader depends on.
//! Any object store (S3, MinIO, an in-memory double) can back the pipeline by
//! implementing it.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Signed URL generation failed: {0}")]
    SignFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A single object upload.
#[derive(Debug, Clone)]
pub struct PutRequest {
    pub key: String,
    pub data: Bytes,
    pub content_type: String,
    pub metadata: HashMap<String, String>,
}

/// Outcome of a successful put. The key is the canonical, backend-final key
/// (including any configured path prefix).
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub size: u64,
    pub etag: Option<String>,
}

/// Persisted-location descriptor for one uploaded file. The canonical key is
/// always present; the signed URL is best-effort and may be absent when URL
/// generation failed.
#[derive(Debug, Clone)]
pub struct ObjectReference {
    pub key: String,
    pub size: u64,
    pub signed_url: Option<String>,
    pub etag: Option<String>,
}

/// Storage capability.
///
/// Implementations must be safe for concurrent use by multiple in-flight
/// requests; the client handle is long-lived and shared.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload one object. A single call per object; no resumable or chunked
    /// semantics.
    async fn put(&self, request: PutRequest) -> StorageResult<StoredObject>;

    /// Generate a time-limited signed GET URL for a stored object.
    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Probe backend reachability for readiness reporting.
    async fn check(&self) -> StorageResult<()> {
        Ok(())
    }
}
