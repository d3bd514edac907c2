//! ROS Ingress Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, and
//! capability traits shared across all ROS ingress components.

pub mod config;
pub mod constants;
pub mod error;
pub mod manifest;
pub mod metrics;
pub mod request;

// Re-export commonly used types
pub use config::{AuthConfig, Config, KafkaConfig, ServerConfig, StorageConfig, UploadConfig};
pub use error::{ErrorMetadata, IngressError, LogLevel};
pub use manifest::Manifest;
pub use metrics::{IngressMetrics, NoOpMetrics};
pub use request::{Identity, RequestContext};
