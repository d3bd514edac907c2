//! ROS Ingress Messaging Library
//!
//! Broker abstraction, wire event types, and the notifier that publishes the
//! downstream ROS event plus the best-effort validation signal.

pub mod events;
pub mod kafka;
pub mod notifier;
pub mod publisher;

// Re-export commonly used types
pub use events::{RosEvent, RosEventMetadata, ValidationEvent, ValidationStatus};
pub use kafka::KafkaPublisher;
pub use notifier::EventNotifier;
pub use publisher::{EventPublisher, PublishError};
