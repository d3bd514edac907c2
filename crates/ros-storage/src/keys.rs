//! Shared key generation for storage backends.
//!
//! Key format: `{schema}/source={source_id}/date={YYYY-MM-DD}/{filename}`.
//! The layout is deterministic: the same inputs always produce the same key,
//! which makes re-ingestion of the same manifest overwrite in place instead
//! of accumulating duplicates.

/// Generate the storage key for one selected file.
pub fn upload_key(schema: &str, source_id: &str, date: &str, filename: &str) -> String {
    format!("{}/source={}/date={}/{}", schema, source_id, date, filename)
}
