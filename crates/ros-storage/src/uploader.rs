//! Object uploader: deterministic key construction plus a single upload per
//! selected file.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::keys;
use crate::traits::{ObjectReference, PutRequest, Storage, StorageResult};

/// Schema/partition descriptor for one file upload.
#[derive(Debug, Clone)]
pub struct FilePartition {
    pub schema: String,
    pub source_id: String,
    pub date: String,
    pub filename: String,
}

impl FilePartition {
    pub fn key(&self) -> String {
        keys::upload_key(&self.schema, &self.source_id, &self.date, &self.filename)
    }
}

/// Uploads selected files through the shared storage capability.
#[derive(Clone)]
pub struct ObjectUploader {
    storage: Arc<dyn Storage>,
    url_expiration: Duration,
}

impl ObjectUploader {
    pub fn new(storage: Arc<dyn Storage>, url_expiration: Duration) -> Self {
        Self {
            storage,
            url_expiration,
        }
    }

    /// Upload one file and return its reference. The upload itself is
    /// authoritative; signed URL generation afterwards is best-effort and its
    /// failure is logged, not propagated - the canonical key still identifies
    /// the object.
    pub async fn upload(
        &self,
        partition: &FilePartition,
        data: Bytes,
        content_type: &str,
        metadata: HashMap<String, String>,
    ) -> StorageResult<ObjectReference> {
        let stored = self
            .storage
            .put(PutRequest {
                key: partition.key(),
                data,
                content_type: content_type.to_string(),
                metadata,
            })
            .await?;

        let signed_url = match self
            .storage
            .signed_url(&stored.key, self.url_expiration)
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    key = %stored.key,
                    "Failed to generate signed URL for uploaded object"
                );
                None
            }
        };

        Ok(ObjectReference {
            key: stored.key,
            size: stored.size,
            signed_url,
            etag: stored.etag,
        })
    }
}
