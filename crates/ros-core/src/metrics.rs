//! Metrics-sink capability.
//!
//! The pipeline reports counters and timings through this trait instead of
//! touching process-wide registries. The HTTP layer decides what backs it;
//! the default is a no-op.

use std::time::Duration;

/// Sink for pipeline metrics. Implementations must be cheap and non-blocking.
pub trait IngressMetrics: Send + Sync {
    /// An upload request entered the pipeline.
    fn upload_received(&self, content_type: &str);

    /// An upload request left the pipeline with the given outcome
    /// ("success" or a stable reason code).
    fn upload_completed(&self, outcome: &str);

    /// Size of an accepted archive in bytes.
    fn upload_size(&self, content_type: &str, bytes: u64);

    /// One storage operation finished.
    fn storage_operation(&self, operation: &str, outcome: &str, duration: Duration);

    /// One broker publish finished.
    fn publish_operation(&self, topic: &str, outcome: &str, duration: Duration);
}

/// No-op sink for tests and deployments without a metrics backend.
pub struct NoOpMetrics;

impl IngressMetrics for NoOpMetrics {
    fn upload_received(&self, _content_type: &str) {}
    fn upload_completed(&self, _outcome: &str) {}
    fn upload_size(&self, _content_type: &str, _bytes: u64) {}
    fn storage_operation(&self, _operation: &str, _outcome: &str, _duration: Duration) {}
    fn publish_operation(&self, _topic: &str, _outcome: &str, _duration: Duration) {}
}
