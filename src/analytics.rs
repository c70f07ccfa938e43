//! Cross-dataset analytics over the full set of findings.

use crate::model::{Finding, SeverityCounts, TopCve};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Strict CVE identifier pattern: 4-digit year, at least 4 sequence digits.
/// Advisory ids not matching (GHSA, RUSTSEC, vendor ids) stay in `items`
/// but are excluded from the top-CVE ranking.
fn cve_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^CVE-\d{4}-\d{4,}$").expect("CVE pattern is a valid regex")
    })
}

/// Sum all findings' severities into the global 6-bucket histogram.
#[must_use]
pub fn global_severity_counts(items: &[Finding]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for finding in items {
        counts.record(finding.severity);
    }
    counts
}

/// Rounded integer percentage of findings with a known fix.
///
/// 0 when there are no findings at all, never NaN.
#[must_use]
pub fn fix_availability_rate(items: &[Finding]) -> u8 {
    if items.is_empty() {
        return 0;
    }
    let with_fix = items.iter().filter(|f| f.has_fix()).count();
    (100.0 * with_fix as f64 / items.len() as f64).round() as u8
}

/// Rank the top-occurring CVEs across all datasets.
///
/// Groups by advisory id (strict CVE pattern only), then sorts by worst
/// severity rank descending, count descending, max CVSS descending with
/// null treated as 0 for the tiebreak only. Ids tied on the whole tuple
/// keep first-seen order. Returns at most `limit` entries.
#[must_use]
pub fn top_cves(items: &[Finding], limit: usize) -> Vec<TopCve> {
    struct Group {
        count: u64,
        datasets: BTreeSet<String>,
        max_cvss: Option<f64>,
        worst_rank: u8,
    }

    let mut groups: IndexMap<&str, Group> = IndexMap::new();
    for finding in items {
        let Some(id) = finding.id.as_deref() else {
            continue;
        };
        if !cve_pattern().is_match(id) {
            continue;
        }
        let group = groups.entry(id).or_insert_with(|| Group {
            count: 0,
            datasets: BTreeSet::new(),
            max_cvss: None,
            worst_rank: 0,
        });
        group.count += 1;
        group.datasets.insert(finding.dataset.clone());
        if let Some(score) = finding.cvss {
            group.max_cvss = Some(group.max_cvss.map_or(score, |m| m.max(score)));
        }
        group.worst_rank = group.worst_rank.max(finding.severity_rank);
    }

    let mut ranked: Vec<TopCve> = groups
        .into_iter()
        .map(|(id, group)| TopCve {
            id: id.to_string(),
            count: group.count,
            datasets: group.datasets.into_iter().collect(),
            max_cvss: group.max_cvss,
            worst_severity_rank: group.worst_rank,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.worst_severity_rank
            .cmp(&a.worst_severity_rank)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| {
                b.max_cvss
                    .unwrap_or(0.0)
                    .total_cmp(&a.max_cvss.unwrap_or(0.0))
            })
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn finding(dataset: &str, id: Option<&str>, severity: Severity, cvss: Option<f64>) -> Finding {
        Finding {
            dataset: dataset.to_string(),
            id: id.map(str::to_owned),
            title: "Vulnerability".to_string(),
            severity,
            severity_rank: severity.rank(),
            cvss,
            component: None,
            version: None,
            purl: None,
            licenses: vec![],
            direct: true,
            cwes: vec![],
            urls: vec![],
            fixed_versions: vec![],
        }
    }

    fn with_fix(mut f: Finding) -> Finding {
        f.fixed_versions = vec!["*".to_string()];
        f
    }

    #[test]
    fn test_global_counts_sum_across_datasets() {
        let items = vec![
            finding("a", None, Severity::High, None),
            finding("b", None, Severity::High, None),
            finding("b", None, Severity::Unknown, None),
        ];
        let counts = global_severity_counts(&items);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_fix_rate_zero_on_empty_input() {
        assert_eq!(fix_availability_rate(&[]), 0);
    }

    #[test]
    fn test_fix_rate_rounds_to_integer_percentage() {
        let items = vec![
            with_fix(finding("a", None, Severity::High, None)),
            finding("a", None, Severity::High, None),
            finding("a", None, Severity::High, None),
        ];
        // 1/3 = 33.33…% rounds to 33.
        assert_eq!(fix_availability_rate(&items), 33);

        let items = vec![
            with_fix(finding("a", None, Severity::High, None)),
            with_fix(finding("a", None, Severity::High, None)),
            finding("a", None, Severity::High, None),
        ];
        // 2/3 = 66.66…% rounds to 67.
        assert_eq!(fix_availability_rate(&items), 67);
    }

    #[test]
    fn test_fix_rate_bounds() {
        let all = vec![with_fix(finding("a", None, Severity::Low, None))];
        assert_eq!(fix_availability_rate(&all), 100);
    }

    #[test]
    fn test_top_cves_filters_non_cve_identifiers() {
        let items = vec![
            finding("a", Some("CVE-2024-0001"), Severity::High, None),
            finding("a", Some("GHSA-abcd-1234"), Severity::Critical, None),
            finding("a", Some("CVE-24-1"), Severity::Critical, None),
            finding("a", Some("CVE-2024-123"), Severity::Critical, None),
            finding("a", None, Severity::Critical, None),
        ];
        let ranked = top_cves(&items, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "CVE-2024-0001");
    }

    #[test]
    fn test_top_cves_aggregates_across_datasets() {
        let items = vec![
            finding("stable", Some("CVE-2024-9999"), Severity::High, Some(7.0)),
            finding("arm64", Some("CVE-2024-9999"), Severity::Critical, Some(9.2)),
        ];
        let ranked = top_cves(&items, 10);
        assert_eq!(ranked.len(), 1);
        let entry = &ranked[0];
        assert_eq!(entry.count, 2);
        assert_eq!(entry.datasets, vec!["arm64", "stable"]);
        assert_eq!(entry.worst_severity_rank, 4);
        assert_eq!(entry.max_cvss, Some(9.2));
    }

    #[test]
    fn test_top_cves_ordering_tuple() {
        let items = vec![
            // Rank 3, count 2, cvss 9.9
            finding("a", Some("CVE-2024-0001"), Severity::High, Some(9.9)),
            finding("a", Some("CVE-2024-0001"), Severity::High, None),
            // Rank 4, count 1, no cvss: worst rank dominates everything.
            finding("a", Some("CVE-2024-0002"), Severity::Critical, None),
            // Rank 3, count 1, cvss 5.0
            finding("a", Some("CVE-2024-0003"), Severity::High, Some(5.0)),
        ];
        let ranked = top_cves(&items, 10);
        let ids: Vec<&str> = ranked.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["CVE-2024-0002", "CVE-2024-0001", "CVE-2024-0003"]);
    }

    #[test]
    fn test_top_cves_cvss_tiebreak_treats_null_as_zero() {
        let items = vec![
            finding("a", Some("CVE-2024-0010"), Severity::High, None),
            finding("a", Some("CVE-2024-0011"), Severity::High, Some(0.1)),
        ];
        let ranked = top_cves(&items, 10);
        assert_eq!(ranked[0].id, "CVE-2024-0011");
        assert_eq!(ranked[1].max_cvss, None);
    }

    #[test]
    fn test_top_cves_respects_limit() {
        let items: Vec<Finding> = (0..15)
            .map(|i| {
                finding(
                    "a",
                    Some(&format!("CVE-2024-{:04}", i)),
                    Severity::High,
                    None,
                )
            })
            .collect();
        assert_eq!(top_cves(&items, 10).len(), 10);
    }
}
