//! Event notifier: serializes and publishes the primary ROS event and the
//! best-effort validation signal.

use std::sync::Arc;
use std::time::Duration;

use ros_core::config::KafkaConfig;
use ros_core::constants::{INGRESS_SERVICE_NAME, SERVICE_NAME};
use ros_core::{IngressError, RequestContext};

use crate::events::{RosEvent, ValidationEvent, ValidationStatus};
use crate::publisher::{EventPublisher, PublishError};

pub struct EventNotifier {
    publisher: Arc<dyn EventPublisher>,
    topic: String,
    validation_topic: String,
    event_timeout: Duration,
    validation_timeout: Duration,
}

impl EventNotifier {
    pub fn new(publisher: Arc<dyn EventPublisher>, config: &KafkaConfig) -> Self {
        Self {
            publisher,
            topic: config.topic.clone(),
            validation_topic: config.validation_topic.clone(),
            event_timeout: Duration::from_secs(config.event_timeout_secs),
            validation_timeout: Duration::from_secs(config.validation_timeout_secs),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Effective acknowledgment budget: the configured ceiling, shrunk to the
    /// caller deadline when one is closer.
    fn budget(&self, ctx: &RequestContext, ceiling: Duration) -> Duration {
        match ctx.remaining() {
            Some(remaining) => ceiling.min(remaining),
            None => ceiling,
        }
    }

    /// Publish the primary event. Failure here fails the whole request.
    pub async fn publish_event(
        &self,
        ctx: &RequestContext,
        event: &RosEvent,
    ) -> Result<(), IngressError> {
        let payload = serde_json::to_vec(event)
            .map_err(|e| IngressError::Delivery(format!("failed to serialize event: {}", e)))?;

        let headers = [
            ("service", SERVICE_NAME.to_string()),
            ("request_id", ctx.request_id.clone()),
            ("org_id", event.metadata.org_id.clone()),
        ];

        let timeout = self.budget(ctx, self.event_timeout);
        self.publisher
            .publish(&self.topic, &ctx.request_id, payload, &headers, timeout)
            .await
            .map_err(|e| match e {
                PublishError::Timeout(d) => {
                    IngressError::DeliveryTimeout(format!("no acknowledgment within {:?}", d))
                }
                other => IngressError::Delivery(other.to_string()),
            })?;

        tracing::info!(
            topic = %self.topic,
            request_id = %ctx.request_id,
            files = event.storage_keys.len(),
            "Published ROS event"
        );
        Ok(())
    }

    /// Publish the validation status. Best-effort: failures are logged here
    /// and never propagate, so no caller discipline is needed to ignore them.
    pub async fn publish_validation(&self, ctx: &RequestContext, status: ValidationStatus) {
        let event = ValidationEvent {
            request_id: ctx.request_id.clone(),
            status,
        };
        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    request_id = %ctx.request_id,
                    "Failed to serialize validation event"
                );
                return;
            }
        };

        let headers = [
            ("service", INGRESS_SERVICE_NAME.to_string()),
            ("request_id", ctx.request_id.clone()),
        ];

        let timeout = self.budget(ctx, self.validation_timeout);
        if let Err(e) = self
            .publisher
            .publish(
                &self.validation_topic,
                &ctx.request_id,
                payload,
                &headers,
                timeout,
            )
            .await
        {
            tracing::warn!(
                error = %IngressError::ValidationDelivery(e.to_string()),
                topic = %self.validation_topic,
                request_id = %ctx.request_id,
                status = status.as_str(),
                "Failed to publish validation event"
            );
        }
    }
}
