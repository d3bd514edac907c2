//! Kafka-backed publisher.
//!
//! The producer is configured for at-least-once delivery: full-ISR acks and
//! idempotent production. Retry policy lives here, in the client
//! configuration, not in the pipeline.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use ros_core::config::KafkaConfig;

use crate::publisher::{EventPublisher, PublishError};

pub struct KafkaPublisher {
    producer: FutureProducer,
}

impl KafkaPublisher {
    pub fn new(config: &KafkaConfig) -> Result<Self, anyhow::Error> {
        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", config.brokers.join(","))
            .set("client.id", &config.client_id)
            .set("acks", "all")
            .set("enable.idempotence", "true")
            .set("message.send.max.retries", "3")
            .set("linger.ms", "5")
            .set("compression.type", "snappy");

        if config.security_protocol != "PLAINTEXT" {
            client_config.set("security.protocol", &config.security_protocol);
            if let Some(ref mechanism) = config.sasl_mechanism {
                client_config.set("sasl.mechanism", mechanism);
            }
            if let Some(ref username) = config.sasl_username {
                client_config.set("sasl.username", username);
            }
            if let Some(ref password) = config.sasl_password {
                client_config.set("sasl.password", password);
            }
            if let Some(ref ca_location) = config.ssl_ca_location {
                client_config.set("ssl.ca.location", ca_location);
            }
        }

        let producer = client_config.create()?;
        Ok(Self { producer })
    }
}

#[async_trait]
impl EventPublisher for KafkaPublisher {
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        payload: Vec<u8>,
        headers: &[(&str, String)],
        timeout: Duration,
    ) -> Result<(), PublishError> {
        let mut owned_headers = OwnedHeaders::new();
        for (name, value) in headers {
            owned_headers = owned_headers.insert(Header {
                key: name,
                value: Some(value.as_str()),
            });
        }

        let record = FutureRecord::to(topic)
            .key(key)
            .payload(&payload)
            .headers(owned_headers);

        let delivery = tokio::time::timeout(timeout, self.producer.send(record, timeout)).await;

        match delivery {
            Err(_) => Err(PublishError::Timeout(timeout)),
            Ok(Err((KafkaError::MessageProduction(RDKafkaErrorCode::MessageTimedOut), _))) => {
                Err(PublishError::Timeout(timeout))
            }
            Ok(Err((err, _))) => Err(PublishError::Rejected(err.to_string())),
            Ok(Ok((partition, offset))) => {
                tracing::debug!(
                    topic = %topic,
                    partition = partition,
                    offset = offset,
                    key = %key,
                    "Message delivered"
                );
                Ok(())
            }
        }
    }

    async fn check(&self) -> Result<(), PublishError> {
        let producer = self.producer.clone();
        // Metadata fetch is a synchronous librdkafka call.
        tokio::task::spawn_blocking(move || {
            producer
                .client()
                .fetch_metadata(None, Duration::from_secs(2))
        })
        .await
        .map_err(|e| PublishError::Rejected(format!("metadata probe task failed: {}", e)))?
        .map_err(|e| PublishError::Rejected(e.to_string()))?;
        Ok(())
    }
}
