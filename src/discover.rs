//! Document discovery.
//!
//! The pipeline consumes (dataset id, raw bytes) pairs and does not care how
//! they arrive. [`FsDocumentSource`] is the filesystem implementation of
//! that contract: one top-level folder under the input root is one dataset,
//! and JSON documents nested arbitrarily deeper still belong to it.

use crate::error::{Diagnostic, DiagnosticKind, Result, TriageError};
use std::fs;
use std::path::{Path, PathBuf};

/// One discovered document, attributed to its dataset.
#[derive(Debug, Clone)]
pub struct DatasetDocument {
    /// Dataset identifier.
    pub dataset: String,
    /// Document identifier for diagnostics (path relative to the root).
    pub name: String,
    /// Raw document bytes, not yet parsed.
    pub bytes: Vec<u8>,
}

impl DatasetDocument {
    #[must_use]
    pub fn new(dataset: impl Into<String>, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            dataset: dataset.into(),
            name: name.into(),
            bytes,
        }
    }
}

/// What a source found: the documents it could read, plus a diagnostic for
/// every input it had to skip.
#[derive(Debug, Default)]
pub struct Discovery {
    pub documents: Vec<DatasetDocument>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Supplier of documents for a pipeline run.
pub trait DocumentSource {
    /// Enumerate all documents. Failure here is fatal for the run; an
    /// individually unreadable document or subtree is skipped with an
    /// [`DiagnosticKind::Unreadable`] diagnostic instead.
    fn list_documents(&self) -> Result<Discovery>;
}

/// Filesystem-backed document discovery.
#[derive(Debug, Clone)]
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn relative_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    /// Recursively collect `.json` files under `dir`. An unreadable
    /// subdirectory skips only its own subtree: siblings already collected
    /// and siblings yet to come are unaffected.
    fn collect_files(
        &self,
        dataset: &str,
        dir: &Path,
        files: &mut Vec<PathBuf>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                let name = self.relative_name(dir);
                tracing::warn!(dataset, document = %name, "skipping unreadable directory: {e}");
                diagnostics.push(Diagnostic::document(
                    dataset,
                    name,
                    DiagnosticKind::Unreadable,
                    format!("cannot read directory: {e}"),
                ));
                return;
            }
        };
        let mut entries: Vec<_> = entries
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .collect();
        // Sort for a deterministic processing order across platforms.
        entries.sort();
        for path in entries {
            if path.is_dir() {
                self.collect_files(dataset, &path, files, diagnostics);
            } else if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
    }
}

impl DocumentSource for FsDocumentSource {
    fn list_documents(&self) -> Result<Discovery> {
        let mut datasets: Vec<_> = fs::read_dir(&self.root)
            .map_err(|e| {
                TriageError::fatal(format!(
                    "cannot enumerate input root {}: {e}",
                    self.root.display()
                ))
            })?
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        datasets.sort();

        let mut discovery = Discovery::default();
        for dataset_dir in datasets {
            let dataset = dataset_dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();

            let mut files = Vec::new();
            self.collect_files(&dataset, &dataset_dir, &mut files, &mut discovery.diagnostics);

            for file in files {
                let name = self.relative_name(&file);
                match fs::read(&file) {
                    Ok(bytes) => discovery
                        .documents
                        .push(DatasetDocument::new(&dataset, name, bytes)),
                    Err(e) => {
                        tracing::warn!(dataset, document = %name, "skipping unreadable file: {e}");
                        discovery.diagnostics.push(Diagnostic::document(
                            &dataset,
                            name,
                            DiagnosticKind::Unreadable,
                            format!("cannot read file: {e}"),
                        ));
                    }
                }
            }
        }

        Ok(discovery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_dataset_is_first_path_segment() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "stable/sbom.json", "{}");
        write(dir.path(), "stable/nested/deeper/scan.json", "{}");
        write(dir.path(), "arm64/sbom.json", "{}");

        let discovery = FsDocumentSource::new(dir.path()).list_documents().unwrap();
        let docs = &discovery.documents;
        assert_eq!(docs.len(), 3);
        assert!(discovery.diagnostics.is_empty());
        // Datasets in sorted order, nested files still attributed to the
        // top-level folder.
        assert_eq!(docs[0].dataset, "arm64");
        assert_eq!(docs[1].dataset, "stable");
        assert_eq!(docs[2].dataset, "stable");
        assert!(docs[2].name.contains("nested"));
    }

    #[test]
    fn test_non_json_and_root_level_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "stable/sbom.json", "{}");
        write(dir.path(), "stable/readme.txt", "hi");
        write(dir.path(), "stray.json", "{}");

        let discovery = FsDocumentSource::new(dir.path()).list_documents().unwrap();
        assert_eq!(discovery.documents.len(), 1);
        assert_eq!(discovery.documents[0].dataset, "stable");
        assert!(discovery.diagnostics.is_empty());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let source = FsDocumentSource::new("/nonexistent/input/root");
        let err = source.list_documents().unwrap_err();
        assert!(matches!(err, TriageError::Fatal(_)));
    }

    #[test]
    fn test_empty_root_yields_no_documents() {
        let dir = tempfile::tempdir().unwrap();
        let discovery = FsDocumentSource::new(dir.path()).list_documents().unwrap();
        assert!(discovery.documents.is_empty());
        assert!(discovery.diagnostics.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_yields_diagnostic_and_keeps_siblings() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "stable/good.json", "{}");
        // A dangling symlink is discoverable but unreadable.
        std::os::unix::fs::symlink(
            dir.path().join("stable/missing-target"),
            dir.path().join("stable/broken.json"),
        )
        .unwrap();

        let discovery = FsDocumentSource::new(dir.path()).list_documents().unwrap();
        assert_eq!(discovery.documents.len(), 1);
        assert_eq!(discovery.documents[0].name, "stable/good.json");
        assert_eq!(discovery.diagnostics.len(), 1);
        let diag = &discovery.diagnostics[0];
        assert_eq!(diag.kind, DiagnosticKind::Unreadable);
        assert_eq!(diag.dataset, "stable");
        assert!(diag.document.contains("broken.json"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_keeps_sibling_files() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "stable/aaa/first.json", "{}");
        write(dir.path(), "stable/zzz/last.json", "{}");
        let locked = dir.path().join("stable/locked");
        fs::create_dir_all(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Permission bits are bypassed (e.g. running as root); the
            // unreadable-directory path cannot be exercised here.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let discovery = FsDocumentSource::new(dir.path()).list_documents().unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Both siblings survive, sorted before and after the locked subtree.
        let names: Vec<_> = discovery.documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["stable/aaa/first.json", "stable/zzz/last.json"]);
        assert_eq!(discovery.diagnostics.len(), 1);
        assert_eq!(discovery.diagnostics[0].kind, DiagnosticKind::Unreadable);
        assert!(discovery.diagnostics[0].document.contains("locked"));
    }
}
