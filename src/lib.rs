//! **SBOM vulnerability triage snapshot pipeline.**
//!
//! `sbom-triage` ingests CycloneDX documents produced by vulnerability
//! scanners, normalizes their heterogeneous vulnerability and component
//! records into flat [`Finding`](model::Finding)s, computes aggregate
//! security metrics, and emits a JSON [`Snapshot`](model::Snapshot) for
//! interactive triage dashboards.
//!
//! Scanner output varies wildly across vendors and versions: field names
//! change spelling, fields go missing, records carry wrong types. The
//! pipeline is built around tolerant extraction and partial success: a
//! malformed record or document is skipped with a [`Diagnostic`], never
//! aborting its siblings, because a dashboard showing 90% of known
//! vulnerabilities beats one that refuses to render.
//!
//! ## Core flow
//!
//! ```text
//! documents → parsers → normalize (findings) → aggregate (per dataset)
//!           → analytics (cross-dataset) → snapshot
//! ```
//!
//! - **[`parsers`]**: decodes bytes into a lenient CycloneDX shape and
//!   rejects documents with no SBOM signal.
//! - **[`normalize`]**: field extractors, the per-document component index,
//!   and the vulnerability fan-out into findings.
//! - **[`aggregate`]** / **[`analytics`]**: per-dataset summaries, global
//!   severity totals, fix-availability rate, top-CVE ranking.
//! - **[`snapshot`]**: the pure assembly step and snapshot-to-snapshot diff.
//! - **[`pipeline`]**: orchestration; [`pipeline::run_pipeline`] is the
//!   single entry point external tooling invokes.
//! - **[`discover`]**: the filesystem document source (one top-level folder
//!   per dataset).
//!
//! ## Getting started
//!
//! ```no_run
//! use sbom_triage::discover::FsDocumentSource;
//! use sbom_triage::pipeline::run_from_source;
//! use sbom_triage::PipelineConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = FsDocumentSource::new("scans/");
//!     let outcome = run_from_source(&source, &PipelineConfig::default())?;
//!
//!     println!(
//!         "{} findings across {} datasets ({} inputs skipped)",
//!         outcome.snapshot.overall.total,
//!         outcome.snapshot.datasets.len(),
//!         outcome.diagnostics.len()
//!     );
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Counts and percentages fit comfortably; casts are bounded in practice
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    // # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod aggregate;
pub mod analytics;
pub mod config;
pub mod discover;
pub mod error;
pub mod model;
pub mod normalize;
pub mod parsers;
pub mod pipeline;
pub mod snapshot;

// Re-export main types for convenience
pub use config::PipelineConfig;
pub use discover::{DatasetDocument, Discovery, DocumentSource, FsDocumentSource};
pub use error::{Diagnostic, DiagnosticKind, Result, TriageError};
pub use model::{
    DatasetSummary, Finding, Metrics, Overall, Severity, SeverityCounts, Snapshot, TopCve,
};
pub use parsers::{parse_document, CycloneDxDocument};
pub use pipeline::{run_from_source, run_pipeline, run_pipeline_at, PipelineOutcome};
pub use snapshot::{assemble, diff_snapshots, SnapshotDelta};
