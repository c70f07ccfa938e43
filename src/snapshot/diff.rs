//! Snapshot-to-snapshot comparison.
//!
//! An optional enrichment over two pipeline runs. Both snapshots are taken
//! as explicit arguments; nothing here reads ambient state.

use crate::model::{Finding, SeverityCounts, Snapshot};
use serde::Serialize;
use std::collections::HashSet;

/// Differences between two snapshots of the same input set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDelta {
    /// Keys of findings present now but not before.
    pub new_findings: Vec<String>,
    /// Keys of findings present before but gone now.
    pub resolved_findings: Vec<String>,
    pub total_before: u64,
    pub total_after: u64,
    pub severity_before: SeverityCounts,
    pub severity_after: SeverityCounts,
}

impl SnapshotDelta {
    /// Whether anything moved between the two runs.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.new_findings.is_empty() || !self.resolved_findings.is_empty()
    }
}

/// Compare two snapshots by finding identity.
///
/// Findings are keyed by (dataset, advisory id, component, version); the
/// timestamps and derived metrics never participate, so two runs over
/// unchanged input always compare equal.
#[must_use]
pub fn diff_snapshots(previous: &Snapshot, current: &Snapshot) -> SnapshotDelta {
    let before: HashSet<String> = previous.items.iter().map(finding_key).collect();
    let after: HashSet<String> = current.items.iter().map(finding_key).collect();

    let mut new_findings: Vec<String> = after.difference(&before).cloned().collect();
    let mut resolved_findings: Vec<String> = before.difference(&after).cloned().collect();
    new_findings.sort();
    resolved_findings.sort();

    SnapshotDelta {
        new_findings,
        resolved_findings,
        total_before: previous.overall.total,
        total_after: current.overall.total,
        severity_before: previous.overall.severity_counts,
        severity_after: current.overall.severity_counts,
    }
}

fn finding_key(finding: &Finding) -> String {
    format!(
        "{}::{}::{}::{}",
        finding.dataset,
        finding.id.as_deref().unwrap_or("-"),
        finding.component.as_deref().unwrap_or("-"),
        finding.version.as_deref().unwrap_or("-")
    )
}
