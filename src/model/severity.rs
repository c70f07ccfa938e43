//! Severity normalization.
//!
//! Scanner input uses free-text severity labels with arbitrary casing. They
//! are normalized once at the boundary into the closed [`Severity`]
//! enumeration; everything downstream operates on the enum only.

use serde::{Deserialize, Serialize};

/// Normalized severity bucket.
///
/// Variants are declared in ascending rank order so `Ord` agrees with
/// [`Severity::rank`] (the two rank-0 buckets sort `Unknown` before `Info`,
/// which only matters for display).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Unknown,
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Normalize a free-text severity label, case-insensitively.
    ///
    /// `"none"` buckets to `Info` (CVSS "None" is informational); anything
    /// unrecognized or empty buckets to `Unknown`. Total function, never
    /// fails.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            "info" | "none" => Self::Info,
            _ => Self::Unknown,
        }
    }

    /// Fixed severity rank: `{critical: 4, high: 3, medium: 2, low: 1,
    /// info: 0, unknown: 0}`.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Info | Self::Unknown => 0,
        }
    }

    /// Uppercase label, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Info => "INFO",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Histogram over the six severity buckets.
///
/// All buckets are always present in the serialized form, defaulting to 0,
/// so consumers never have to guard against missing keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct SeverityCounts {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
    pub info: u64,
    pub unknown: u64,
}

impl SeverityCounts {
    /// Increment the bucket for one severity.
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Info => self.info += 1,
            Severity::Unknown => self.unknown += 1,
        }
    }

    /// Add another histogram into this one.
    pub fn merge(&mut self, other: &Self) {
        self.critical += other.critical;
        self.high += other.high;
        self.medium += other.medium;
        self.low += other.low;
        self.info += other.info;
        self.unknown += other.unknown;
    }

    /// Count for one bucket.
    #[must_use]
    pub const fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Info => self.info,
            Severity::Unknown => self.unknown,
        }
    }

    /// Sum across all buckets.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.critical + self.high + self.medium + self.low + self.info + self.unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_normalization_is_case_insensitive() {
        for label in ["High", "HIGH", "high", " hIgH "] {
            assert_eq!(Severity::from_label(label), Severity::High);
            assert_eq!(Severity::from_label(label).rank(), 3);
        }
    }

    #[test]
    fn test_rank_table() {
        assert_eq!(Severity::from_label("critical").rank(), 4);
        assert_eq!(Severity::from_label("high").rank(), 3);
        assert_eq!(Severity::from_label("medium").rank(), 2);
        assert_eq!(Severity::from_label("low").rank(), 1);
        assert_eq!(Severity::from_label("info").rank(), 0);
        assert_eq!(Severity::from_label("none").rank(), 0);
        assert_eq!(Severity::from_label("unknown").rank(), 0);
    }

    #[test]
    fn test_unrecognized_and_empty_labels_default_to_unknown() {
        assert_eq!(Severity::from_label(""), Severity::Unknown);
        assert_eq!(Severity::from_label("moderate?"), Severity::Unknown);
        assert_eq!(Severity::from_label("P1"), Severity::Unknown);
    }

    #[test]
    fn test_none_buckets_to_info() {
        assert_eq!(Severity::from_label("None"), Severity::Info);
    }

    #[test]
    fn test_serialized_form_is_uppercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
    }

    #[test]
    fn test_counts_record_and_total() {
        let mut counts = SeverityCounts::default();
        counts.record(Severity::High);
        counts.record(Severity::High);
        counts.record(Severity::Unknown);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_counts_merge() {
        let mut a = SeverityCounts {
            critical: 1,
            ..Default::default()
        };
        let b = SeverityCounts {
            critical: 2,
            low: 5,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.critical, 3);
        assert_eq!(a.low, 5);
        assert_eq!(a.total(), 8);
    }

    #[test]
    fn test_all_buckets_serialized_even_when_zero() {
        let json = serde_json::to_value(SeverityCounts::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["CRITICAL", "HIGH", "MEDIUM", "LOW", "INFO", "UNKNOWN"] {
            assert_eq!(obj.get(key).and_then(|v| v.as_u64()), Some(0), "{key}");
        }
    }
}
