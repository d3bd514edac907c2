//! Broker publish capability.
//!
//! The notifier depends on this trait, not on a concrete client, so tests
//! substitute an in-memory double and production wires in Kafka.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Publish failures. Timeout is distinct from rejection so callers can tell
/// "the broker said no" apart from "the acknowledgment never arrived".
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Broker rejected message: {0}")]
    Rejected(String),

    #[error("Delivery not acknowledged within {0:?}")]
    Timeout(Duration),

    #[error("Message serialization failed: {0}")]
    Serialize(String),
}

/// Publish capability.
///
/// `key` is the partition/ordering key. `headers` are attached to the message
/// envelope so consumers can route and debug without deserializing the body.
/// The call blocks until delivery is acknowledged or `timeout` elapses.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        payload: Vec<u8>,
        headers: &[(&str, String)],
        timeout: Duration,
    ) -> Result<(), PublishError>;

    /// Probe broker reachability for readiness reporting.
    async fn check(&self) -> Result<(), PublishError> {
        Ok(())
    }
}
