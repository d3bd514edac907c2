//! S3/MinIO storage implementation.

use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use ros_core::config::StorageConfig;

use crate::traits::{PutRequest, Storage, StorageError, StorageResult, StoredObject};

/// S3-compatible storage backed by the AWS SDK. Works against AWS S3 and
/// path-style providers such as MinIO.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    path_prefix: String,
}

impl S3Storage {
    /// Create a client and ensure the backing bucket exists. Bucket creation
    /// is idempotent and tolerates losing the race to another instance.
    pub async fn new(config: &StorageConfig) -> StorageResult<Self> {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if let Some(ref endpoint) = config.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }
        let client = Client::from_conf(builder.build());

        let storage = S3Storage {
            client,
            bucket: config.bucket.clone(),
            path_prefix: config.path_prefix.trim_matches('/').to_string(),
        };
        storage.ensure_bucket().await?;
        Ok(storage)
    }

    async fn ensure_bucket(&self) -> StorageResult<()> {
        if self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok()
        {
            return Ok(());
        }

        match self.client.create_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                tracing::info!(bucket = %self.bucket, "Created storage bucket");
                Ok(())
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_bucket_already_owned_by_you()
                    || service_err.is_bucket_already_exists()
                {
                    Ok(())
                } else {
                    Err(StorageError::ConfigError(format!(
                        "failed to create bucket {}: {}",
                        self.bucket, service_err
                    )))
                }
            }
        }
    }

    /// Prepend the configured path prefix, if any.
    fn full_key(&self, key: &str) -> String {
        if self.path_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.path_prefix, key)
        }
    }
}

#[async_trait::async_trait]
impl Storage for S3Storage {
    async fn put(&self, request: PutRequest) -> StorageResult<StoredObject> {
        let key = self.full_key(&request.key);
        let size = request.data.len() as u64;
        let start = std::time::Instant::now();

        let mut put = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(&request.content_type)
            .body(ByteStream::from(request.data));
        for (name, value) in &request.metadata {
            put = put.metadata(name, value);
        }

        let output = put.send().await.map_err(|e| {
            tracing::error!(
                error = %e.into_service_error(),
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(key.clone())
        })?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(StoredObject {
            key,
            size,
            etag: output.e_tag().map(|t| t.to_string()),
        })
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::SignFailed(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::SignFailed(e.into_service_error().to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn check(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| StorageError::BackendError(e.into_service_error().to_string()))?;
        Ok(())
    }
}
