//! Pipeline orchestration.
//!
//! One pass: documents are parsed and normalized independently (in parallel,
//! the per-document step shares nothing), then folded sequentially into
//! per-dataset accumulators and assembled into the snapshot. A run always
//! yields a structurally valid snapshot; per-document and per-record
//! problems become diagnostics, and only a failing document source is fatal.

use crate::aggregate::{aggregate_document, DatasetAccumulator, DocumentAggregate};
use crate::config::PipelineConfig;
use crate::discover::{DatasetDocument, DocumentSource};
use crate::error::{Diagnostic, DiagnosticKind, Result, TriageError};
use crate::model::Snapshot;
use crate::parsers::parse_document;
use crate::snapshot::assemble;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rayon::prelude::*;

/// Result of a pipeline run: the snapshot plus everything that was skipped
/// along the way.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub snapshot: Snapshot,
    pub diagnostics: Vec<Diagnostic>,
}

impl PipelineOutcome {
    /// True when the run saw no datasets and produced no findings. Callers
    /// must treat this as "nothing found", not as failure.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}

/// Exit codes for CI integration.
pub mod exit_codes {
    /// Snapshot produced, no documents or records skipped.
    pub const SUCCESS: i32 = 0;
    /// Snapshot produced, but some input was skipped (data quality).
    pub const DATA_QUALITY: i32 = 1;
    /// No snapshot could be produced.
    pub const ERROR: i32 = 2;
}

/// Run the pipeline over an already-discovered document set, stamping the
/// snapshot with the current wall-clock time.
#[must_use]
pub fn run_pipeline<I>(documents: I) -> PipelineOutcome
where
    I: IntoIterator<Item = DatasetDocument>,
{
    run_pipeline_at(
        documents.into_iter().collect(),
        Utc::now(),
        &PipelineConfig::default(),
    )
}

/// Run the pipeline with an explicit timestamp and configuration.
///
/// The timestamp is injected so tests can freeze the clock: two runs over
/// the same input with the same timestamp produce identical snapshots.
#[must_use]
pub fn run_pipeline_at(
    documents: Vec<DatasetDocument>,
    generated_at: DateTime<Utc>,
    config: &PipelineConfig,
) -> PipelineOutcome {
    // Per-document map: embarrassingly parallel, order-preserving.
    let results: Vec<DocumentResult> = documents
        .par_iter()
        .map(|doc| process_document(doc, config))
        .collect();

    // Sequential reduce: datasets keyed by first appearance.
    let mut accumulators: IndexMap<String, DatasetAccumulator> = IndexMap::new();
    let mut diagnostics = Vec::new();
    for result in results {
        match result {
            DocumentResult::Parsed(aggregate) => {
                diagnostics.extend(aggregate.diagnostics.iter().cloned());
                accumulators
                    .entry(aggregate.dataset.clone())
                    .or_insert_with(|| DatasetAccumulator::new(&aggregate.dataset))
                    .absorb(aggregate);
            }
            DocumentResult::Skipped(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    let snapshot = assemble(
        generated_at,
        accumulators.into_values().collect(),
        config,
    );
    tracing::info!(
        datasets = snapshot.datasets.len(),
        findings = snapshot.overall.total,
        skipped = diagnostics.len(),
        "pipeline run complete"
    );
    if snapshot.is_empty() {
        tracing::info!("no vulnerabilities found; emitting empty snapshot");
    }

    PipelineOutcome {
        snapshot,
        diagnostics,
    }
}

/// Discover documents from a source and run the pipeline over them.
///
/// Only a failing source propagates as an error; everything after discovery
/// degrades to diagnostics. Inputs the source itself had to skip surface in
/// the outcome's diagnostics, ahead of the parse and record ones.
pub fn run_from_source(
    source: &dyn DocumentSource,
    config: &PipelineConfig,
) -> Result<PipelineOutcome> {
    let discovery = source.list_documents()?;
    tracing::info!(
        documents = discovery.documents.len(),
        skipped = discovery.diagnostics.len(),
        "discovered documents"
    );
    let mut outcome = run_pipeline_at(discovery.documents, Utc::now(), config);
    let mut diagnostics = discovery.diagnostics;
    diagnostics.append(&mut outcome.diagnostics);
    outcome.diagnostics = diagnostics;
    Ok(outcome)
}

enum DocumentResult {
    Parsed(DocumentAggregate),
    Skipped(Diagnostic),
}

fn process_document(doc: &DatasetDocument, config: &PipelineConfig) -> DocumentResult {
    match parse_document(&doc.bytes) {
        Ok(parsed) => {
            DocumentResult::Parsed(aggregate_document(&doc.dataset, &doc.name, &parsed, config))
        }
        Err(err) => {
            let kind = match err {
                TriageError::Validation(_) => DiagnosticKind::Validation,
                _ => DiagnosticKind::ParseFailure,
            };
            tracing::warn!(
                dataset = %doc.dataset,
                document = %doc.name,
                "skipping document: {err}"
            );
            DocumentResult::Skipped(Diagnostic::document(
                &doc.dataset,
                &doc.name,
                kind,
                err.to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(dataset: &str, name: &str, value: serde_json::Value) -> DatasetDocument {
        DatasetDocument::new(dataset, name, value.to_string().into_bytes())
    }

    #[test]
    fn test_empty_input_yields_empty_outcome() {
        let outcome = run_pipeline(Vec::new());
        assert!(outcome.is_empty());
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.snapshot.metrics.fix_availability_rate, 0);
    }

    #[test]
    fn test_bad_document_does_not_abort_siblings() {
        let outcome = run_pipeline(vec![
            DatasetDocument::new("stable", "broken.json", b"{ nope".to_vec()),
            document(
                "stable",
                "good.json",
                json!({"vulnerabilities": [{"id": "CVE-2024-0001", "severity": "high"}]}),
            ),
        ]);
        assert_eq!(outcome.snapshot.overall.total, 1);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::ParseFailure);
    }

    #[test]
    fn test_document_without_signal_is_a_validation_skip() {
        let outcome = run_pipeline(vec![document(
            "stable",
            "other.json",
            json!({"unrelated": true}),
        )]);
        assert!(outcome.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::Validation);
    }

    #[test]
    fn test_datasets_keyed_by_first_appearance() {
        let outcome = run_pipeline(vec![
            document("zeta", "a.json", json!({"vulnerabilities": [{"id": "z"}]})),
            document("alpha", "b.json", json!({"vulnerabilities": [{"id": "a"}]})),
            document("zeta", "c.json", json!({"vulnerabilities": [{"id": "z2"}]})),
        ]);
        // Items keep processing order (zeta first), summaries are sorted.
        assert_eq!(outcome.snapshot.items[0].dataset, "zeta");
        assert_eq!(outcome.snapshot.items[1].dataset, "zeta");
        assert_eq!(outcome.snapshot.items[2].dataset, "alpha");
        assert_eq!(outcome.snapshot.datasets[0].id, "alpha");
        assert_eq!(outcome.snapshot.datasets[1].id, "zeta");
        assert_eq!(outcome.snapshot.datasets[1].vulnerabilities, 2);
    }

    #[test]
    fn test_frozen_clock_runs_are_identical() {
        let docs = || {
            vec![document(
                "stable",
                "sbom.json",
                json!({
                    "components": [{"name": "libfoo", "version": "1.2", "bom-ref": "r"}],
                    "vulnerabilities": [
                        {"id": "CVE-2024-0001", "affects": [{"ref": "r"}],
                         "ratings": [{"score": 7.5, "severity": "high"}]}
                    ]
                }),
            )]
        };
        let frozen = "2024-05-01T10:00:00Z".parse().unwrap();
        let config = PipelineConfig::default();
        let first = run_pipeline_at(docs(), frozen, &config);
        let second = run_pipeline_at(docs(), frozen, &config);
        assert_eq!(first.snapshot, second.snapshot);
    }
}
