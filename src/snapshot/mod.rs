//! Snapshot assembly.
//!
//! A pure reducer over already-computed per-dataset results: no I/O, no
//! clock access (the timestamp is passed in), which keeps it directly
//! unit-testable.

pub mod diff;

pub use diff::{diff_snapshots, SnapshotDelta};

use crate::aggregate::DatasetAccumulator;
use crate::analytics::{fix_availability_rate, global_severity_counts, top_cves};
use crate::config::PipelineConfig;
use crate::model::{Metrics, Overall, Snapshot};
use chrono::{DateTime, Utc};

/// Combine per-dataset accumulators into the final snapshot.
///
/// `accumulators` must be in dataset processing order: `items` preserves
/// that order (it is never re-sorted), while `datasets` is sorted by id.
#[must_use]
pub fn assemble(
    generated_at: DateTime<Utc>,
    accumulators: Vec<DatasetAccumulator>,
    config: &PipelineConfig,
) -> Snapshot {
    let mut datasets: Vec<_> = accumulators.iter().map(DatasetAccumulator::summary).collect();
    datasets.sort_by(|a, b| a.id.cmp(&b.id));

    let items: Vec<_> = accumulators
        .into_iter()
        .flat_map(DatasetAccumulator::into_findings)
        .collect();

    let overall = Overall {
        total: items.len() as u64,
        severity_counts: global_severity_counts(&items),
    };
    let metrics = Metrics {
        fix_availability_rate: fix_availability_rate(&items),
        top_cves: top_cves(&items, config.top_cve_limit),
    };

    Snapshot {
        generated_at,
        datasets,
        items,
        overall,
        metrics,
    }
}
