//! Upload pipeline orchestrator.
//!
//! Sequences extract -> resolve -> upload -> notify for one request and owns
//! the failure policy: everything up to and including the primary event
//! publish is fatal; the trailing validation publish is best-effort. The
//! extraction directory is released on every exit path by the RAII guard
//! owned in this function's scope.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use ros_core::constants::ROS_FILE_CONTENT_TYPE;
use ros_core::{IngressError, IngressMetrics, Manifest, RequestContext};
use ros_messaging::{EventNotifier, RosEvent, RosEventMetadata, ValidationStatus};
use ros_storage::{FilePartition, ObjectReference, ObjectUploader};

use crate::extractor::PayloadExtractor;
use crate::resolver::{self, SelectedFile};

/// Successful pipeline outcome.
#[derive(Debug)]
pub struct PipelineResult {
    pub request_id: String,
    pub references: Vec<ObjectReference>,
}

pub struct UploadPipeline {
    extractor: PayloadExtractor,
    uploader: ObjectUploader,
    notifier: Arc<EventNotifier>,
    metrics: Arc<dyn IngressMetrics>,
}

impl UploadPipeline {
    pub fn new(
        extractor: PayloadExtractor,
        uploader: ObjectUploader,
        notifier: Arc<EventNotifier>,
        metrics: Arc<dyn IngressMetrics>,
    ) -> Self {
        Self {
            extractor,
            uploader,
            notifier,
            metrics,
        }
    }

    /// Run the whole pipeline for one request. There are no pipeline-level
    /// retries; transient storage or broker errors surface to the caller.
    /// Every completed attempt reports its outcome on the validation topic,
    /// best-effort.
    pub async fn run(
        &self,
        ctx: &RequestContext,
        payload: Bytes,
    ) -> Result<PipelineResult, IngressError> {
        let result = self.process(ctx, payload).await;

        let status = if result.is_ok() {
            ValidationStatus::Success
        } else {
            ValidationStatus::Failure
        };
        self.notifier.publish_validation(ctx, status).await;

        result
    }

    async fn process(
        &self,
        ctx: &RequestContext,
        payload: Bytes,
    ) -> Result<PipelineResult, IngressError> {
        let extracted = self.extract(ctx, payload).await?;

        let manifest = resolver::resolve_manifest(&extracted.entries, extracted.dir.path())?;
        let selected =
            resolver::select_ros_files(&manifest, &extracted.entries, extracted.dir.path())?;

        tracing::info!(
            request_id = %ctx.request_id,
            manifest_uuid = %manifest.uuid,
            cluster_id = %manifest.cluster_id,
            ros_files_count = selected.len(),
            "Extracted payload"
        );

        let references = self.upload_all(ctx, &manifest, &selected).await?;

        let event = self.build_event(ctx, &manifest, &references);
        let start = Instant::now();
        let published = self.notifier.publish_event(ctx, &event).await;
        let outcome = if published.is_ok() { "success" } else { "error" };
        self.metrics
            .publish_operation(self.notifier.topic(), outcome, start.elapsed());
        published?;

        Ok(PipelineResult {
            request_id: ctx.request_id.clone(),
            references,
        })
        // `extracted` drops here (and on every earlier `?`), removing the
        // request-scoped directory.
    }

    async fn extract(
        &self,
        ctx: &RequestContext,
        payload: Bytes,
    ) -> Result<crate::extractor::ExtractedArchive, IngressError> {
        let extractor = self.extractor.clone();
        let request_id = ctx.request_id.clone();
        let task =
            tokio::task::spawn_blocking(move || extractor.extract(&payload, &request_id));

        let joined = match ctx.remaining() {
            // On deadline expiry the blocking task is abandoned; its result
            // (and the directory guard inside) is dropped when it finishes.
            Some(budget) => tokio::time::timeout(budget, task).await.map_err(|_| {
                IngressError::Extraction("request deadline exceeded during extraction".to_string())
            })?,
            None => task.await,
        };

        joined.map_err(|e| IngressError::Extraction(format!("extraction task failed: {}", e)))?
    }

    async fn upload_all(
        &self,
        ctx: &RequestContext,
        manifest: &Manifest,
        selected: &[SelectedFile],
    ) -> Result<Vec<ObjectReference>, IngressError> {
        let schema = ctx.schema_name();
        let date = manifest.partition_date();
        let mut references = Vec::with_capacity(selected.len());

        // Fail-fast: the first failing file aborts the remaining uploads.
        // Already-stored objects are left in place; there is no rollback.
        for file in selected {
            let work = self.upload_one(ctx, manifest, file, &schema, &date);
            let reference = match ctx.remaining() {
                // The caller deadline also covers uploads; on expiry the
                // in-flight put is abandoned.
                Some(budget) => tokio::time::timeout(budget, work).await.map_err(|_| {
                    IngressError::Upload {
                        file: file.name.clone(),
                        reason: "request deadline exceeded during upload".to_string(),
                    }
                })?,
                None => work.await,
            }?;
            references.push(reference);
        }

        Ok(references)
    }

    async fn upload_one(
        &self,
        ctx: &RequestContext,
        manifest: &Manifest,
        file: &SelectedFile,
        schema: &str,
        date: &str,
    ) -> Result<ObjectReference, IngressError> {
        let data = tokio::fs::read(&file.path)
            .await
            .map(Bytes::from)
            .map_err(|e| IngressError::Upload {
                file: file.name.clone(),
                reason: format!("failed to read extracted file: {}", e),
            })?;

        let partition = FilePartition {
            schema: schema.to_string(),
            source_id: manifest.cluster_id.clone(),
            date: date.to_string(),
            filename: file.name.clone(),
        };

        let metadata = HashMap::from([
            ("manifest-id".to_string(), manifest.uuid.clone()),
            ("request-id".to_string(), ctx.request_id.clone()),
            ("cluster-uuid".to_string(), manifest.cluster_id.clone()),
            (
                "operator-version".to_string(),
                manifest.operator_version.clone(),
            ),
        ]);

        let start = Instant::now();
        let result = self
            .uploader
            .upload(&partition, data, ROS_FILE_CONTENT_TYPE, metadata)
            .await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        self.metrics
            .storage_operation("upload", outcome, start.elapsed());

        let reference = result.map_err(|e| IngressError::Upload {
            file: file.name.clone(),
            reason: e.to_string(),
        })?;

        tracing::info!(
            request_id = %ctx.request_id,
            file_name = %file.name,
            key = %reference.key,
            size = reference.size,
            "Uploaded resource optimization file"
        );
        Ok(reference)
    }

    fn build_event(
        &self,
        ctx: &RequestContext,
        manifest: &Manifest,
        references: &[ObjectReference],
    ) -> RosEvent {
        RosEvent {
            request_id: ctx.request_id.clone(),
            credential: ctx.credential.clone(),
            metadata: RosEventMetadata {
                account: ctx.account_number().to_string(),
                org_id: ctx.org_id().to_string(),
                // The cluster is both the source and the provider for
                // operator-generated payloads.
                source_id: manifest.cluster_id.clone(),
                provider_id: manifest.cluster_id.clone(),
                cluster_id: manifest.cluster_id.clone(),
                cluster_alias: manifest.cluster_alias().to_string(),
                operator_version: manifest.operator_version.clone(),
            },
            retrieval_locators: references
                .iter()
                .map(|r| r.signed_url.clone().unwrap_or_default())
                .collect(),
            storage_keys: references.iter().map(|r| r.key.clone()).collect(),
        }
    }
}
