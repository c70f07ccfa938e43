//! Canonical finding and per-dataset summary structures.

use super::{Severity, SeverityCounts};
use serde::{Deserialize, Serialize};

/// One vulnerability attributed to one (or no) component.
///
/// A vulnerability naming N affected components fans out into N findings;
/// one naming none yields a single unattributed finding with null component
/// fields. Field names follow the serialized output contract, which is
/// versionless: additions are fine, renames and removals are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Origin dataset identifier. Never null.
    pub dataset: String,
    /// Advisory identifier, if one was declared.
    pub id: Option<String>,
    /// Description truncated to the configured length, `"Vulnerability"`
    /// when the source record has none.
    pub title: String,
    /// Normalized severity bucket.
    pub severity: Severity,
    /// Rank consistent with `severity` under the fixed table.
    pub severity_rank: u8,
    /// Best CVSS score seen across the record's ratings, if any.
    pub cvss: Option<f64>,
    /// Matched component name, null when unattributed or unresolved.
    pub component: Option<String>,
    pub version: Option<String>,
    pub purl: Option<String>,
    /// Declared license names, in declaration order, not deduplicated.
    pub licenses: Vec<String>,
    /// False only when the component's scope is "optional" or "transitive".
    pub direct: bool,
    pub cwes: Vec<String>,
    /// Advisory reference URLs.
    pub urls: Vec<String>,
    /// `["*"]` iff the record's analysis response contains "update".
    pub fixed_versions: Vec<String>,
}

impl Finding {
    /// Whether a fix is known to be available.
    #[must_use]
    pub fn has_fix(&self) -> bool {
        !self.fixed_versions.is_empty()
    }
}

/// Per-dataset rollup of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    /// Dataset identifier (top-level input folder name).
    pub id: String,
    /// Source `metadata.timestamp`, passed through untouched.
    pub created: Option<String>,
    /// Number of declared components across the dataset's documents.
    pub components: u64,
    /// Number of findings (not raw vulnerability records).
    pub vulnerabilities: u64,
    /// Findings bucketed by severity; all six buckets always present.
    pub severity_counts: SeverityCounts,
}
