//! The snapshot output contract.

use super::{DatasetSummary, Finding, SeverityCounts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The final artifact of a pipeline run, and the sole handoff to the UI.
///
/// Produced fresh on every run; never mutated in place. An empty but
/// structurally valid snapshot (zero datasets, zero items) is a legitimate
/// outcome distinguishable from failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Wall-clock time at assembly.
    pub generated_at: DateTime<Utc>,
    /// Per-dataset summaries, sorted by id ascending.
    pub datasets: Vec<DatasetSummary>,
    /// All findings, in dataset processing order then input order.
    pub items: Vec<Finding>,
    pub overall: Overall,
    pub metrics: Metrics,
}

/// Global finding totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overall {
    pub total: u64,
    pub severity_counts: SeverityCounts,
}

/// Cross-dataset analytics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Rounded integer percentage of findings with a known fix, 0..=100.
    /// Exactly 0 (never NaN) when there are no findings.
    pub fix_availability_rate: u8,
    /// Top-occurring CVEs, at most the configured limit.
    #[serde(rename = "topCVEs")]
    pub top_cves: Vec<TopCve>,
}

/// One entry in the top-CVE ranking.
///
/// Only advisory ids matching `CVE-\d{4}-\d{4,}` participate; other ids
/// still appear in `items` but are excluded from this ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCve {
    pub id: String,
    /// Occurrence count across all findings.
    pub count: u64,
    /// Distinct datasets the CVE was seen in, sorted ascending.
    pub datasets: Vec<String>,
    /// Highest CVSS score seen, null when no occurrence carried one.
    pub max_cvss: Option<f64>,
    /// Highest severity rank seen across occurrences.
    pub worst_severity_rank: u8,
}

impl Snapshot {
    /// A structurally valid snapshot with no data.
    #[must_use]
    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            datasets: Vec::new(),
            items: Vec::new(),
            overall: Overall::default(),
            metrics: Metrics::default(),
        }
    }

    /// True when the run produced no datasets and no findings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty() && self.overall.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_shape() {
        let snap = Snapshot::empty(Utc::now());
        assert!(snap.is_empty());
        assert_eq!(snap.overall.total, 0);
        assert_eq!(snap.metrics.fix_availability_rate, 0);
        assert!(snap.metrics.top_cves.is_empty());
    }

    #[test]
    fn test_snapshot_serializes_contract_keys() {
        let snap = Snapshot::empty(Utc::now());
        let json = serde_json::to_value(&snap).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["generatedAt", "datasets", "items", "overall", "metrics"] {
            assert!(obj.contains_key(key), "missing contract field {key}");
        }
        let metrics = obj["metrics"].as_object().unwrap();
        assert!(metrics.contains_key("fixAvailabilityRate"));
        assert!(metrics.contains_key("topCVEs"));
        let overall = obj["overall"].as_object().unwrap();
        assert!(overall.contains_key("total"));
        assert!(overall.contains_key("severityCounts"));
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let snap = Snapshot::empty(Utc::now());
        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
