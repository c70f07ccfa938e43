//! Vulnerability normalization.
//!
//! Fans each vulnerability record out across its affected components,
//! emitting one flat [`Finding`] per (vulnerability, component) pair, or a
//! single unattributed finding when no components are named. A malformed
//! record is skipped with a diagnostic; it never aborts the document.

use super::extract::{
    extract_affected_refs, extract_cwes, extract_license_names, extract_urls, has_fix_available,
    pick_best_rating,
};
use super::index::ComponentIndex;
use crate::config::PipelineConfig;
use crate::error::Diagnostic;
use crate::model::{Finding, Severity};
use crate::parsers::{CycloneDxDocument, RawComponent, RawVulnerability};

/// Title used when the source record carries no description.
const DEFAULT_TITLE: &str = "Vulnerability";

/// Normalize all vulnerability records of one document into findings.
///
/// The number of findings emitted for one record is `max(1, |affects|)`.
/// Skipped records are reported through the returned diagnostics.
#[must_use]
pub fn normalize_document(
    dataset: &str,
    document: &str,
    doc: &CycloneDxDocument,
    config: &PipelineConfig,
) -> (Vec<Finding>, Vec<Diagnostic>) {
    let index = ComponentIndex::build(&doc.components);
    let mut findings = Vec::new();
    let mut diagnostics = Vec::new();

    for (position, entry) in doc.vulnerabilities.iter().enumerate() {
        let record: RawVulnerability = match serde_json::from_value(entry.clone()) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(
                    dataset,
                    document,
                    record = position,
                    "skipping malformed vulnerability record: {err}"
                );
                diagnostics.push(Diagnostic::record(
                    dataset,
                    document,
                    position,
                    format!("malformed vulnerability record: {err}"),
                ));
                continue;
            }
        };
        normalize_record(dataset, &record, &index, config, &mut findings);
    }

    (findings, diagnostics)
}

/// Emit the findings for one well-formed record.
fn normalize_record(
    dataset: &str,
    record: &RawVulnerability,
    index: &ComponentIndex,
    config: &PipelineConfig,
    findings: &mut Vec<Finding>,
) {
    let best = pick_best_rating(record.rating_entries());
    let severity_label = record
        .severity
        .as_deref()
        .or(best.as_ref().and_then(|b| b.severity.as_deref()));
    let severity = severity_label.map_or(Severity::Unknown, Severity::from_label);
    let cvss = best.as_ref().and_then(|b| b.score);

    let title = record
        .description
        .as_deref()
        .map_or_else(|| DEFAULT_TITLE.to_string(), |d| truncate(d, config.title_max_len));
    let cwes = extract_cwes(&record.cwes);
    let urls = extract_urls(&record.references);
    let fixed_versions = if has_fix_available(record.analysis.as_ref()) {
        vec!["*".to_string()]
    } else {
        Vec::new()
    };

    let refs = extract_affected_refs(&record.affects);
    let targets: Vec<Option<&str>> = if refs.is_empty() {
        // Unattributed: the vulnerability names no component at all.
        vec![None]
    } else {
        refs.iter().map(|r| Some(r.as_str())).collect()
    };

    for target in targets {
        let component: Option<&RawComponent> = target.and_then(|r| index.get(r));
        findings.push(Finding {
            dataset: dataset.to_string(),
            id: record.id.clone(),
            title: title.clone(),
            severity,
            severity_rank: severity.rank(),
            cvss,
            component: component.and_then(|c| c.name.clone()),
            version: component.and_then(|c| c.version.clone()),
            purl: component.and_then(|c| c.purl.clone()),
            licenses: component.map_or_else(Vec::new, |c| extract_license_names(&c.licenses)),
            direct: component.map_or(true, RawComponent::is_direct),
            cwes: cwes.clone(),
            urls: urls.clone(),
            fixed_versions: fixed_versions.clone(),
        });
    }
}

/// Truncate on a character boundary; no word-boundary trimming.
fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
