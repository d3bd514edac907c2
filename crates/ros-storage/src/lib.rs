//! ROS Ingress Storage Library
//!
//! Object-storage abstraction and the S3/MinIO implementation used to persist
//! selected resource-optimization files.
//!
//! # Storage key format
//!
//! Keys partition uploads by tenant schema, source cluster, and day:
//!
//! `{schema}/source={source_id}/date={YYYY-MM-DD}/{filename}`
//!
//! Key generation is centralized in the `keys` module so the layout cannot
//! drift between backends.

pub mod keys;
pub mod s3;
pub mod traits;
pub mod uploader;

// Re-export commonly used types
pub use s3::S3Storage;
pub use traits::{ObjectReference, PutRequest, Storage, StorageError, StorageResult, StoredObject};
pub use uploader::{FilePartition, ObjectUploader};
