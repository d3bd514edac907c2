//! Manifest resolution and file selection.
//!
//! Locates the manifest among extracted entries (exact base-name match),
//! parses and validates it, then intersects its declared selection list with
//! what was actually extracted.

use std::fs;
use std::path::{Path, PathBuf};

use ros_core::constants::MANIFEST_FILE_NAME;
use ros_core::{IngressError, Manifest};

/// A file confirmed present in both the manifest selection list and the
/// extracted entries.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

/// Locate and parse the manifest document.
pub fn resolve_manifest(entries: &[String], extract_dir: &Path) -> Result<Manifest, IngressError> {
    let manifest_entry = entries
        .iter()
        .find(|entry| base_name(entry) == Some(MANIFEST_FILE_NAME))
        .ok_or(IngressError::ManifestNotFound)?;

    let manifest_path = extract_dir.join(manifest_entry);
    tracing::debug!(manifest_path = %manifest_path.display(), "Found manifest file");

    let data = fs::read(&manifest_path)?;
    let manifest = Manifest::from_json(&data)?;

    tracing::debug!(
        manifest_uuid = %manifest.uuid,
        cluster_id = %manifest.cluster_id,
        files_count = manifest.files.len(),
        ros_files_count = manifest.resource_optimization_files.len(),
        "Parsed manifest"
    );

    Ok(manifest)
}

/// Intersect the manifest's selection list with the extracted entries,
/// matching by base name. Declared-but-missing files are dropped with a
/// warning; an empty result is fatal.
pub fn select_ros_files(
    manifest: &Manifest,
    entries: &[String],
    extract_dir: &Path,
) -> Result<Vec<SelectedFile>, IngressError> {
    if manifest.resource_optimization_files.is_empty() {
        tracing::debug!("No resource optimization files declared in manifest");
        return Err(IngressError::NoSelectedFiles);
    }

    let mut selected = Vec::new();
    for name in &manifest.resource_optimization_files {
        let found = entries
            .iter()
            .find(|entry| base_name(entry) == Some(name.as_str()));
        match found {
            Some(entry) => {
                let path = extract_dir.join(entry);
                if path.is_file() {
                    selected.push(SelectedFile {
                        name: name.clone(),
                        path,
                    });
                } else {
                    tracing::warn!(ros_file = %name, "Selected file declared in manifest but missing on disk");
                }
            }
            None => {
                tracing::warn!(ros_file = %name, "Selected file declared in manifest but not extracted");
            }
        }
    }

    if selected.is_empty() {
        return Err(IngressError::NoSelectedFiles);
    }

    tracing::debug!(selected_count = selected.len(), "Selected resource optimization files");
    Ok(selected)
}

fn base_name(entry: &str) -> Option<&str> {
    Path::new(entry).file_name().and_then(|n| n.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn manifest_with(selection: &[&str]) -> Manifest {
        let value = serde_json::json!({
            "uuid": "u-1",
            "cluster_id": "c-1",
            "files": ["cost.csv", "manifest.json"],
            "resource_optimization_files": selection,
        });
        Manifest::from_json(&serde_json::to_vec(&value).unwrap()).unwrap()
    }

    #[test]
    fn test_manifest_base_name_must_match_exactly() {
        let dir = tempfile::tempdir().unwrap();
        // A substring match like "not-manifest.json" must not count.
        let entries = vec!["not-manifest.json".to_string(), "notes.txt".to_string()];
        let err = resolve_manifest(&entries, dir.path()).unwrap_err();
        assert!(matches!(err, IngressError::ManifestNotFound));
    }

    #[test]
    fn test_manifest_found_in_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("20240501")).unwrap();
        fs::write(
            dir.path().join("20240501/manifest.json"),
            serde_json::to_vec(&serde_json::json!({
                "uuid": "u-1",
                "cluster_id": "c-1",
            }))
            .unwrap(),
        )
        .unwrap();

        let entries = vec!["20240501/manifest.json".to_string()];
        let manifest = resolve_manifest(&entries, dir.path()).unwrap();
        assert_eq!(manifest.uuid, "u-1");
    }

    #[test]
    fn test_empty_selection_list_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest_with(&[]);
        let err = select_ros_files(&manifest, &["cost.csv".to_string()], dir.path()).unwrap_err();
        assert!(matches!(err, IngressError::NoSelectedFiles));
    }

    #[test]
    fn test_missing_selected_files_are_dropped_with_survivors_kept() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cost.csv"), "a,b\n").unwrap();

        let manifest = manifest_with(&["cost.csv", "ghost.csv"]);
        let entries = vec!["cost.csv".to_string()];
        let selected = select_ros_files(&manifest, &entries, dir.path()).unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "cost.csv");
    }

    #[test]
    fn test_all_selected_files_missing_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest_with(&["ghost.csv"]);
        let err = select_ros_files(&manifest, &["cost.csv".to_string()], dir.path()).unwrap_err();
        assert!(matches!(err, IngressError::NoSelectedFiles));
    }
}
