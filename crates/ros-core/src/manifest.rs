//! Manifest document parsed from an uploaded archive.
//!
//! The manifest describes one ingestion unit produced by the cluster
//! operator: which files the archive carries and which of them matter to the
//! resource-optimization workflow. It is parsed once per request and
//! immutable afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IngressError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub uuid: String,
    pub cluster_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_alias: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub resource_optimization_files: Vec<String>,
    #[serde(default)]
    pub certified: bool,
    #[serde(default)]
    pub operator_version: String,
    #[serde(default)]
    pub daily_reports: bool,
}

impl Manifest {
    /// Parse a manifest from raw JSON and validate its required identifiers.
    pub fn from_json(data: &[u8]) -> Result<Self, IngressError> {
        let manifest: Manifest = serde_json::from_slice(data)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Required identifiers must be present and non-empty. Their absence is a
    /// hard extraction failure, not a warning.
    pub fn validate(&self) -> Result<(), IngressError> {
        if self.uuid.trim().is_empty() {
            return Err(IngressError::ManifestValidation(
                "manifest uuid is missing".to_string(),
            ));
        }
        if self.cluster_id.trim().is_empty() {
            return Err(IngressError::ManifestValidation(
                "manifest cluster_id is missing".to_string(),
            ));
        }
        Ok(())
    }

    /// Display alias for the cluster, falling back to the cluster id when the
    /// alias is absent or empty.
    pub fn cluster_alias(&self) -> &str {
        match self.cluster_alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias,
            _ => &self.cluster_id,
        }
    }

    /// Partition date for storage keys: the manifest date when present,
    /// otherwise the current UTC day.
    pub fn partition_date(&self) -> String {
        self.date
            .unwrap_or_else(Utc::now)
            .format("%Y-%m-%d")
            .to_string()
    }
}
