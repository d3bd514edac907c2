//! Shared constants for the ingress pipeline.

/// Reserved base name of the manifest document inside an uploaded archive.
/// Matched exactly, never as a substring.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Content type assigned to uploaded resource-optimization CSV files.
pub const ROS_FILE_CONTENT_TYPE: &str = "text/csv";

/// Schema segment used in storage keys when no tenant scoping is available.
pub const DEFAULT_SCHEMA: &str = "default";

/// Account/org identifier placed in event metadata when the caller identity
/// carries none. See DESIGN.md for the provenance of this default.
pub const UNKNOWN_TENANT: &str = "unknown";

/// Service name stamped into event headers for downstream routing.
pub const SERVICE_NAME: &str = "ros";

/// Service name stamped into validation event headers.
pub const INGRESS_SERVICE_NAME: &str = "ingress";
