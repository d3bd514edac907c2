//! Configuration module
//!
//! Typed configuration for the ingress service, loaded from environment
//! variables with sensible defaults and validated before use. Endpoint,
//! credential, and topic names are deployment-supplied; nothing here is
//! read at request time.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_URL_EXPIRATION_SECS: u64 = 172_800; // 48 hours
const DEFAULT_MAX_UPLOAD_SIZE: u64 = 100 * 1024 * 1024; // 100MB
const DEFAULT_EVENT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_VALIDATION_TIMEOUT_SECS: u64 = 10;

/// HTTP server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
}

/// S3/MinIO storage configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub force_path_style: bool,
    pub url_expiration_secs: u64,
    pub path_prefix: String,
}

/// Kafka producer configuration
#[derive(Clone, Debug)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    pub topic: String,
    pub validation_topic: String,
    pub client_id: String,
    pub security_protocol: String,
    pub sasl_mechanism: Option<String>,
    pub sasl_username: Option<String>,
    pub sasl_password: Option<String>,
    pub ssl_ca_location: Option<String>,
    pub event_timeout_secs: u64,
    pub validation_timeout_secs: u64,
}

/// Upload processing configuration
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub max_upload_size: u64,
    pub temp_dir: String,
    pub allowed_content_types: Vec<String>,
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub enabled: bool,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub kafka: KafkaConfig,
    pub upload: UploadConfig,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = Config {
            server: ServerConfig {
                port: env_parsed("SERVER_PORT", DEFAULT_SERVER_PORT),
                read_timeout_secs: env_parsed("SERVER_READ_TIMEOUT", 30),
                write_timeout_secs: env_parsed("SERVER_WRITE_TIMEOUT", 30),
                shutdown_timeout_secs: env_parsed("SERVER_SHUTDOWN_TIMEOUT", 30),
            },
            storage: StorageConfig {
                endpoint: env_opt("STORAGE_ENDPOINT"),
                region: env_or("STORAGE_REGION", "us-east-1"),
                bucket: env_or("STORAGE_BUCKET", "insights-ros-data"),
                force_path_style: env_parsed("STORAGE_FORCE_PATH_STYLE", true),
                url_expiration_secs: env_parsed(
                    "STORAGE_URL_EXPIRATION",
                    DEFAULT_URL_EXPIRATION_SECS,
                ),
                path_prefix: env_or("STORAGE_PATH_PREFIX", "ros"),
            },
            kafka: KafkaConfig {
                brokers: env_list("KAFKA_BROKERS", &["localhost:9092"]),
                topic: env_or("KAFKA_ROS_TOPIC", "hccm.ros.events"),
                validation_topic: env_or("KAFKA_VALIDATION_TOPIC", "platform.upload.validation"),
                client_id: env_or("KAFKA_CLIENT_ID", "ros-ingress"),
                security_protocol: env_or("KAFKA_SECURITY_PROTOCOL", "PLAINTEXT"),
                sasl_mechanism: env_opt("KAFKA_SASL_MECHANISM"),
                sasl_username: env_opt("KAFKA_SASL_USERNAME"),
                sasl_password: env_opt("KAFKA_SASL_PASSWORD"),
                ssl_ca_location: env_opt("KAFKA_SSL_CA_LOCATION"),
                event_timeout_secs: env_parsed("KAFKA_EVENT_TIMEOUT", DEFAULT_EVENT_TIMEOUT_SECS),
                validation_timeout_secs: env_parsed(
                    "KAFKA_VALIDATION_TIMEOUT",
                    DEFAULT_VALIDATION_TIMEOUT_SECS,
                ),
            },
            upload: UploadConfig {
                max_upload_size: env_parsed("UPLOAD_MAX_SIZE", DEFAULT_MAX_UPLOAD_SIZE),
                temp_dir: env_or("UPLOAD_TEMP_DIR", "/tmp"),
                allowed_content_types: env_list(
                    "UPLOAD_ALLOWED_TYPES",
                    &["application/vnd.redhat.hccm.upload"],
                ),
            },
            auth: AuthConfig {
                enabled: env_parsed("AUTH_ENABLED", true),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable before wiring up clients.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage.bucket.trim().is_empty() {
            anyhow::bail!("storage bucket is required");
        }
        if self.kafka.brokers.is_empty() {
            anyhow::bail!("kafka brokers are required");
        }
        if self.kafka.topic.trim().is_empty() {
            anyhow::bail!("kafka topic is required");
        }
        if self.upload.temp_dir.trim().is_empty() {
            anyhow::bail!("upload temp dir is required");
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_list(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(v) if !v.is_empty() => v.split(',').map(|s| s.trim().to_string()).collect(),
        _ => default.iter().map(|s| s.to_string()).collect(),
    }
}
