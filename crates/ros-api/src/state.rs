//! Application state wiring.

use std::sync::Arc;
use std::time::Duration;

use ros_core::{Config, IngressMetrics, NoOpMetrics};
use ros_ingest::{PayloadExtractor, UploadPipeline};
use ros_messaging::{EventNotifier, EventPublisher, KafkaPublisher};
use ros_storage::{ObjectUploader, S3Storage, Storage};

use crate::auth::{AnonymousAuthenticator, Authenticator, IdentityHeaderAuthenticator};

pub struct AppState {
    pub config: Config,
    pub pipeline: UploadPipeline,
    pub authenticator: Arc<dyn Authenticator>,
    pub metrics: Arc<dyn IngressMetrics>,
    // Shared client handles kept for readiness probes.
    pub storage: Arc<dyn Storage>,
    pub publisher: Arc<dyn EventPublisher>,
}

/// Build the long-lived clients and the pipeline they feed. The storage and
/// broker clients are shared across all in-flight requests.
pub async fn build_state(config: Config) -> Result<Arc<AppState>, anyhow::Error> {
    let storage: Arc<dyn Storage> = Arc::new(S3Storage::new(&config.storage).await?);
    let uploader = ObjectUploader::new(
        storage.clone(),
        Duration::from_secs(config.storage.url_expiration_secs),
    );

    let publisher: Arc<dyn EventPublisher> = Arc::new(KafkaPublisher::new(&config.kafka)?);
    let notifier = Arc::new(EventNotifier::new(publisher.clone(), &config.kafka));

    let extractor = PayloadExtractor::new(config.upload.temp_dir.clone());
    let metrics: Arc<dyn IngressMetrics> = Arc::new(NoOpMetrics);
    let pipeline = UploadPipeline::new(extractor, uploader, notifier, metrics.clone());

    let authenticator: Arc<dyn Authenticator> = if config.auth.enabled {
        Arc::new(IdentityHeaderAuthenticator)
    } else {
        tracing::warn!("Authentication disabled, accepting anonymous uploads");
        Arc::new(AnonymousAuthenticator)
    };

    Ok(Arc::new(AppState {
        config,
        pipeline,
        authenticator,
        metrics,
        storage,
        publisher,
    }))
}
