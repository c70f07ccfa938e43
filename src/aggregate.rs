//! Per-dataset aggregation.
//!
//! A dataset is one top-level input folder; it may span several documents
//! nested arbitrarily deeper. Each document reduces independently to a
//! [`DocumentAggregate`] (the parallelizable step), and aggregates of the
//! same dataset then fold sequentially into a [`DatasetAccumulator`].

use crate::config::PipelineConfig;
use crate::error::Diagnostic;
use crate::model::{DatasetSummary, Finding, SeverityCounts};
use crate::normalize::normalize_document;
use crate::parsers::CycloneDxDocument;

/// Everything one document contributes to its dataset.
#[derive(Debug)]
pub struct DocumentAggregate {
    /// Owning dataset identifier.
    pub dataset: String,
    /// Source metadata timestamp, if declared.
    pub created: Option<String>,
    /// Declared component count (raw array length, including entries the
    /// index could not use).
    pub component_count: u64,
    /// Normalized findings, in input order.
    pub findings: Vec<Finding>,
    /// Records skipped while normalizing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Reduce one parsed document into its dataset contribution.
#[must_use]
pub fn aggregate_document(
    dataset: &str,
    document: &str,
    doc: &CycloneDxDocument,
    config: &PipelineConfig,
) -> DocumentAggregate {
    let (findings, diagnostics) = normalize_document(dataset, document, doc, config);
    DocumentAggregate {
        dataset: dataset.to_string(),
        created: doc.created(),
        component_count: doc.components.len() as u64,
        findings,
        diagnostics,
    }
}

/// Running state for one dataset while documents fold in.
#[derive(Debug)]
pub struct DatasetAccumulator {
    id: String,
    created: Option<String>,
    components: u64,
    severity_counts: SeverityCounts,
    findings: Vec<Finding>,
}

impl DatasetAccumulator {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created: None,
            components: 0,
            severity_counts: SeverityCounts::default(),
            findings: Vec::new(),
        }
    }

    /// Fold one document's contribution in. `created` keeps the first
    /// non-null timestamp in processing order.
    pub fn absorb(&mut self, aggregate: DocumentAggregate) {
        debug_assert_eq!(aggregate.dataset, self.id);
        if self.created.is_none() {
            self.created = aggregate.created;
        }
        self.components += aggregate.component_count;
        for finding in &aggregate.findings {
            self.severity_counts.record(finding.severity);
        }
        self.findings.extend(aggregate.findings);
    }

    /// Dataset identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Findings accumulated so far, in document processing order.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Produce the summary for the snapshot.
    #[must_use]
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            id: self.id.clone(),
            created: self.created.clone(),
            components: self.components,
            vulnerabilities: self.findings.len() as u64,
            severity_counts: self.severity_counts,
        }
    }

    /// Consume the accumulator, yielding its findings.
    #[must_use]
    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}
