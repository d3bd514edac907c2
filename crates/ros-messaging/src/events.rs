//! Wire event types published to the broker.
//!
//! `RosEvent` is the primary notification consumed by the downstream
//! resource-optimization processor; `ValidationEvent` is the secondary,
//! best-effort status signal. Both serialize to canonical JSON.

use serde::{Deserialize, Serialize};

/// Metadata block of the primary event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosEventMetadata {
    pub account: String,
    pub org_id: String,
    pub source_id: String,
    pub provider_id: String,
    pub cluster_id: String,
    pub cluster_alias: String,
    pub operator_version: String,
}

/// Primary notification event. `retrieval_locators` and `storage_keys` are
/// index-aligned: entry i of both refers to the same uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosEvent {
    pub request_id: String,
    /// Opaque caller credential for downstream re-authentication.
    pub credential: String,
    pub metadata: RosEventMetadata,
    pub retrieval_locators: Vec<String>,
    pub storage_keys: Vec<String>,
}

/// Coarse outcome carried by the validation event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Success,
    Failure,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Success => "success",
            ValidationStatus::Failure => "failure",
        }
    }
}

/// Secondary, best-effort status event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationEvent {
    pub request_id: String,
    pub status: ValidationStatus,
}
