//! Unified error types for sbom-triage.
//!
//! The pipeline favors maximal partial success: per-record and per-document
//! problems are downgraded to [`Diagnostic`]s and processing continues. Only
//! conditions with no sensible partial result (the document source itself is
//! unusable) surface as a [`TriageError`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-triage operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TriageError {
    /// A document could not be decoded into a CycloneDX-shaped object.
    #[error("Failed to decode document: {context}")]
    Document {
        context: String,
        #[source]
        source: DocumentErrorKind,
    },

    /// A document decoded fine but carries no plausible CycloneDX signal.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// IO errors with path context.
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The whole run is impossible (e.g. documents cannot be enumerated).
    #[error("Pipeline failed: {0}")]
    Fatal(String),
}

/// Specific document decode error kinds.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DocumentErrorKind {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Document root is not a JSON object")]
    NotAnObject,
}

/// Convenient Result type for sbom-triage operations.
pub type Result<T> = std::result::Result<T, TriageError>;

impl TriageError {
    /// Create a document decode error with context.
    pub fn document(context: impl Into<String>, source: DocumentErrorKind) -> Self {
        Self::Document {
            context: context.into(),
            source,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a fatal pipeline error.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal(message.into())
    }
}

impl From<std::io::Error> for TriageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for TriageError {
    fn from(err: serde_json::Error) -> Self {
        Self::document(
            "JSON deserialization",
            DocumentErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Classification of a recovered, non-fatal problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Document bytes were not valid JSON or not an object.
    ParseFailure,
    /// Document decoded but had no CycloneDX signal at all.
    Validation,
    /// A single vulnerability or component entry was structurally invalid.
    MalformedRecord,
    /// A document or directory could not be read from its source.
    Unreadable,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseFailure => write!(f, "parse-failure"),
            Self::Validation => write!(f, "validation"),
            Self::MalformedRecord => write!(f, "malformed-record"),
            Self::Unreadable => write!(f, "unreadable"),
        }
    }
}

/// A recovered problem, with enough context for post-hoc debugging.
///
/// Diagnostics are returned alongside the snapshot so operators can
/// investigate data quality without blocking the dashboard.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Diagnostic {
    /// Dataset the affected document belongs to.
    pub dataset: String,
    /// Document identifier (usually its path relative to the input root).
    pub document: String,
    /// Index of the offending record within the document, when applicable.
    pub record: Option<usize>,
    /// What went wrong, coarsely.
    pub kind: DiagnosticKind,
    /// Human-readable detail.
    pub message: String,
}

impl Diagnostic {
    /// Diagnostic for a document-level skip.
    pub fn document(
        dataset: impl Into<String>,
        document: impl Into<String>,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            document: document.into(),
            record: None,
            kind,
            message: message.into(),
        }
    }

    /// Diagnostic for a single skipped record.
    pub fn record(
        dataset: impl Into<String>,
        document: impl Into<String>,
        index: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            document: document.into(),
            record: Some(index),
            kind: DiagnosticKind::MalformedRecord,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.record {
            Some(idx) => write!(
                f,
                "[{}] {}/{} record #{}: {}",
                self.kind, self.dataset, self.document, idx, self.message
            ),
            None => write!(
                f,
                "[{}] {}/{}: {}",
                self.kind, self.dataset, self.document, self.message
            ),
        }
    }
}
