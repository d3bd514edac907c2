//! Archive extraction into a request-scoped temporary directory.
//!
//! The extractor knows nothing about manifests; it unpacks a gzip-compressed
//! tar stream and reports which entries it materialized. Entries that would
//! escape the extraction root and entry types other than regular files or
//! directories are skipped, never extracted.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use ros_core::IngressError;
use tar::{Archive, EntryType};

/// RAII guard for the request-scoped extraction directory. The directory is
/// removed when the guard drops, on every exit path.
#[derive(Debug)]
pub struct ExtractionDir {
    path: PathBuf,
}

impl ExtractionDir {
    fn create(base: &Path, request_id: &str) -> Result<Self, IngressError> {
        let path = base.join(request_id);
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ExtractionDir {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::error!(
                    error = %e,
                    dir = %self.path.display(),
                    "Failed to remove extraction directory"
                );
            }
        }
    }
}

/// Result of a successful extraction: the scoped directory plus the entry
/// names of all regular files that were materialized.
#[derive(Debug)]
pub struct ExtractedArchive {
    pub dir: ExtractionDir,
    pub entries: Vec<String>,
}

/// Unpacks uploaded archives under a configured temp directory, one uniquely
/// named subdirectory per request id so concurrent requests cannot collide.
#[derive(Debug, Clone)]
pub struct PayloadExtractor {
    temp_dir: PathBuf,
}

impl PayloadExtractor {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    /// Extract a gzip-compressed tar stream. Synchronous filesystem work;
    /// callers on an async runtime should run it on the blocking pool.
    pub fn extract(&self, data: &[u8], request_id: &str) -> Result<ExtractedArchive, IngressError> {
        let dir = ExtractionDir::create(&self.temp_dir, request_id)?;

        tracing::debug!(
            request_id = %request_id,
            extract_dir = %dir.path().display(),
            "Starting payload extraction"
        );

        // Guard is live from here on: any early return drops it and removes
        // the partially populated directory.
        let entries = self.unpack(data, dir.path())?;

        tracing::debug!(
            request_id = %request_id,
            extracted_count = entries.len(),
            "Extraction completed"
        );

        Ok(ExtractedArchive { dir, entries })
    }

    fn unpack(&self, data: &[u8], root: &Path) -> Result<Vec<String>, IngressError> {
        let decoder = GzDecoder::new(data);
        let mut archive = Archive::new(decoder);
        let mut extracted = Vec::new();

        let iter = archive
            .entries()
            .map_err(|e| IngressError::Extraction(format!("unreadable archive: {}", e)))?;

        for entry in iter {
            let mut entry =
                entry.map_err(|e| IngressError::Extraction(format!("bad tar entry: {}", e)))?;

            let name = entry
                .path()
                .map_err(|e| IngressError::Extraction(format!("bad entry path: {}", e)))?
                .to_string_lossy()
                .into_owned();

            let Some(dest) = resolve_within(root, Path::new(&name)) else {
                tracing::warn!(entry = %name, "Skipping entry with suspicious path");
                continue;
            };

            match entry.header().entry_type() {
                EntryType::Directory => {
                    fs::create_dir_all(&dest).map_err(|e| {
                        IngressError::Extraction(format!("failed to create {}: {}", name, e))
                    })?;
                }
                EntryType::Regular => {
                    if let Some(parent) = dest.parent() {
                        fs::create_dir_all(parent).map_err(|e| {
                            IngressError::Extraction(format!("failed to create {}: {}", name, e))
                        })?;
                    }
                    let mut file = fs::File::create(&dest).map_err(|e| {
                        IngressError::Extraction(format!("failed to create {}: {}", name, e))
                    })?;
                    io::copy(&mut entry, &mut file).map_err(|e| {
                        IngressError::Extraction(format!("failed to write {}: {}", name, e))
                    })?;
                    extracted.push(name);
                }
                other => {
                    tracing::debug!(entry = %name, entry_type = ?other, "Skipping unsupported entry type");
                }
            }
        }

        Ok(extracted)
    }
}

/// Resolve an archive entry name against the extraction root, component by
/// component. Returns `None` for any name that would escape the root
/// (parent-dir components, absolute paths, prefixes).
fn resolve_within(root: &Path, name: &Path) -> Option<PathBuf> {
    let mut out = root.to_path_buf();
    for component in name.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(tar_buf: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(tar_buf).unwrap();
        encoder.finish().unwrap()
    }

    fn build_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut tar_buf = Vec::new();
        {
            let mut builder = tar::Builder::new(&mut tar_buf);
            for (name, content) in files {
                let mut header = tar::Header::new_gnu();
                header.set_size(content.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder.append_data(&mut header, *name, *content).unwrap();
            }
            builder.finish().unwrap();
        }
        gzip(&tar_buf)
    }

    /// Like `build_archive`, but writes entry names straight into the raw
    /// header bytes. `Builder::append_data` refuses names with parent
    /// components, which is exactly what a hostile archive carries.
    fn build_archive_unchecked(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut tar_buf = Vec::new();
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_entry_type(EntryType::Regular);
            header.as_mut_bytes()[..name.len()].copy_from_slice(name.as_bytes());
            header.set_cksum();
            tar_buf.extend_from_slice(header.as_bytes());
            tar_buf.extend_from_slice(content);
            let pad = (512 - content.len() % 512) % 512;
            tar_buf.extend(std::iter::repeat(0u8).take(pad));
        }
        tar_buf.extend_from_slice(&[0u8; 1024]);
        gzip(&tar_buf)
    }

    #[test]
    fn test_extracts_regular_files() {
        let base = tempfile::tempdir().unwrap();
        let extractor = PayloadExtractor::new(base.path());
        let archive = build_archive(&[("manifest.json", b"{}"), ("cost.csv", b"a,b\n")]);

        let extracted = extractor.extract(&archive, "req-1").unwrap();
        assert_eq!(extracted.entries, vec!["manifest.json", "cost.csv"]);
        assert!(extracted.dir.path().join("cost.csv").exists());
    }

    #[test]
    fn test_traversal_entries_are_skipped() {
        let base = tempfile::tempdir().unwrap();
        let extractor = PayloadExtractor::new(base.path());
        let archive =
            build_archive_unchecked(&[("../../etc/passwd", b"nope"), ("ok.csv", b"1\n")]);

        let extracted = extractor.extract(&archive, "req-2").unwrap();
        assert_eq!(extracted.entries, vec!["ok.csv"]);

        // Only the safe entry was materialized inside the extraction dir.
        let mut names: Vec<String> = fs::read_dir(extracted.dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["ok.csv"]);
        assert_eq!(
            fs::read(extracted.dir.path().join("ok.csv")).unwrap(),
            b"1\n"
        );
    }

    #[test]
    fn test_absolute_path_entries_are_skipped() {
        let base = tempfile::tempdir().unwrap();
        let extractor = PayloadExtractor::new(base.path());
        let archive = build_archive_unchecked(&[("/etc/shadow", b"nope"), ("ok.csv", b"1\n")]);

        let extracted = extractor.extract(&archive, "req-5").unwrap();
        assert_eq!(extracted.entries, vec!["ok.csv"]);
    }

    #[test]
    fn test_malformed_stream_is_fatal_and_leaves_no_directory() {
        let base = tempfile::tempdir().unwrap();
        let extractor = PayloadExtractor::new(base.path());

        let err = extractor.extract(b"definitely not gzip", "req-3").unwrap_err();
        assert!(matches!(err, IngressError::Extraction(_)));
        assert!(!base.path().join("req-3").exists());
    }

    #[test]
    fn test_conflicting_entry_paths_surface_as_extraction_failure() {
        let base = tempfile::tempdir().unwrap();
        let extractor = PayloadExtractor::new(base.path());
        // "a" lands as a regular file, so the second entry cannot create it
        // as a parent directory.
        let archive = build_archive(&[("a", b"file"), ("a/b.csv", b"1\n")]);

        let err = extractor.extract(&archive, "req-6").unwrap_err();
        assert!(matches!(err, IngressError::Extraction(_)));
        assert!(!base.path().join("req-6").exists());
    }

    #[test]
    fn test_directory_removed_on_drop() {
        let base = tempfile::tempdir().unwrap();
        let extractor = PayloadExtractor::new(base.path());
        let archive = build_archive(&[("cost.csv", b"1\n")]);

        let path = {
            let extracted = extractor.extract(&archive, "req-4").unwrap();
            extracted.dir.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_resolve_within_rejects_absolute_paths() {
        let root = Path::new("/tmp/extract");
        assert!(resolve_within(root, Path::new("/etc/passwd")).is_none());
        assert!(resolve_within(root, Path::new("../up")).is_none());
        assert_eq!(
            resolve_within(root, Path::new("./a/b.csv")),
            Some(root.join("a/b.csv"))
        );
    }
}
