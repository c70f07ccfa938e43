//! Field extractors over variably-shaped input fragments.
//!
//! Each extractor is an explicit, ordered list of "try this field, else
//! that field, else default" rules. All of them are total: malformed
//! fragments contribute nothing instead of failing.

use serde_json::Value;

/// Best scoring entry picked from a record's ratings.
#[derive(Debug, Clone, PartialEq)]
pub struct BestRating {
    /// Numeric CVSS score (`score`, else `baseScore`).
    pub score: Option<f64>,
    /// Severity label (`severity`, else `baseSeverity`), uppercased.
    pub severity: Option<String>,
    /// Rating method (`method`, else `source` or `source.name`).
    pub method: Option<String>,
}

/// Pick the most alarming rating out of a record's scoring entries.
///
/// A candidate is valid if it has a numeric score or a severity string.
/// Among valid candidates the highest score wins, ties broken by first-seen
/// order; unscored candidates lose to any scored one. Returns `None` when
/// no entry is valid. Scanners report multiple rating methods; the highest
/// score is the conservative choice for triage.
#[must_use]
pub fn pick_best_rating(entries: &[Value]) -> Option<BestRating> {
    let mut best: Option<BestRating> = None;
    for entry in entries {
        let score = entry
            .get("score")
            .and_then(Value::as_f64)
            .or_else(|| entry.get("baseScore").and_then(Value::as_f64));
        let severity = entry
            .get("severity")
            .and_then(Value::as_str)
            .or_else(|| entry.get("baseSeverity").and_then(Value::as_str))
            .map(str::to_uppercase);
        if score.is_none() && severity.is_none() {
            continue;
        }
        let method = entry
            .get("method")
            .and_then(Value::as_str)
            .or_else(|| entry.get("source").and_then(Value::as_str))
            .or_else(|| {
                entry
                    .get("source")
                    .and_then(|s| s.get("name"))
                    .and_then(Value::as_str)
            })
            .map(str::to_owned);

        let candidate = BestRating {
            score,
            severity,
            method,
        };
        let wins = match &best {
            None => true,
            Some(current) => match (candidate.score, current.score) {
                (Some(new), Some(old)) => new > old,
                (Some(_), None) => true,
                _ => false,
            },
        };
        if wins {
            best = Some(candidate);
        }
    }
    best
}

/// Collect license names from a component's license declarations.
///
/// Per entry: prefer `license.id`, else `license.name`, else the SPDX
/// `expression` string. Entries contributing nothing are skipped. Order is
/// preserved and duplicates are kept, reflecting the declarations
/// faithfully.
#[must_use]
pub fn extract_license_names(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| {
            let license = entry.get("license");
            license
                .and_then(|l| l.get("id"))
                .and_then(Value::as_str)
                .or_else(|| license.and_then(|l| l.get("name")).and_then(Value::as_str))
                .or_else(|| entry.get("expression").and_then(Value::as_str))
                .map(str::to_owned)
        })
        .collect()
}

/// Strict fix-availability check: `analysis.response` is an array containing
/// the literal `"update"`. Free-text recommendation heuristics are
/// deliberately not used; they would make the fix rate indeterministic.
#[must_use]
pub fn has_fix_available(analysis: Option<&Value>) -> bool {
    analysis
        .and_then(|a| a.get("response"))
        .and_then(Value::as_array)
        .is_some_and(|responses| {
            responses
                .iter()
                .any(|r| r.as_str() == Some("update"))
        })
}

/// Collect CWE identifiers, accepting both object (`{id}`) and raw scalar
/// entries. Scalars are stringified verbatim.
#[must_use]
pub fn extract_cwes(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(_) => entry.get("id").and_then(scalar_to_string),
            _ => scalar_to_string(entry),
        })
        .collect()
}

/// Collect reference URLs from `references[].url`; absent or malformed
/// entries are dropped, not nulled.
#[must_use]
pub fn extract_urls(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| entry.get("url").and_then(Value::as_str))
        .map(str::to_owned)
        .collect()
}

/// Resolve `affects` entries to component refs. Accepts `{ref}` objects and
/// plain strings; anything else is dropped.
#[must_use]
pub fn extract_affected_refs(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(_) => entry.get("ref").and_then(Value::as_str),
            Value::String(s) => Some(s.as_str()),
            _ => None,
        })
        .map(str::to_owned)
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
