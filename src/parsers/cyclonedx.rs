//! Lenient CycloneDX document structures.
//!
//! Scanner output varies across vendors and versions: fields are renamed
//! (`bom-ref` vs `bomRef`, `score` vs `baseScore`), omitted, or carry the
//! wrong type. Rather than deep schema validation, every field here
//! deserializes leniently (a wrong-typed field degrades to its default)
//! and the fallback order between competing spellings is centralized in one
//! accessor per concept.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level CycloneDX-shaped document.
///
/// `components` and `vulnerabilities` stay as raw values so that a single
/// malformed entry can be skipped with a diagnostic instead of failing the
/// whole document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CycloneDxDocument {
    #[serde(deserialize_with = "lenient_string")]
    pub bom_format: Option<String>,
    pub spec_version: Option<Value>,
    pub metadata: Option<Value>,
    #[serde(deserialize_with = "lenient_array")]
    pub components: Vec<Value>,
    #[serde(deserialize_with = "lenient_array")]
    pub vulnerabilities: Vec<Value>,
}

impl CycloneDxDocument {
    /// Source creation timestamp (`metadata.timestamp`), passed through
    /// untouched. Scanners emit non-RFC3339 values; the field is
    /// display-only so no date parsing is attempted.
    #[must_use]
    pub fn created(&self) -> Option<String> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("timestamp"))
            .and_then(Value::as_str)
            .map(str::to_owned)
    }
}

/// One declared component, as leniently extracted from a raw entry.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawComponent {
    #[serde(rename = "bom-ref", deserialize_with = "lenient_string")]
    pub bom_ref: Option<String>,
    #[serde(rename = "bomRef", deserialize_with = "lenient_string")]
    pub bom_ref_camel: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub version: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub purl: Option<String>,
    #[serde(deserialize_with = "lenient_array")]
    pub licenses: Vec<Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub scope: Option<String>,
}

impl RawComponent {
    /// Extract a component from a raw entry; `None` when the entry is not
    /// an object. All fields inside an object degrade individually, so an
    /// object entry never fails.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Identity key within one document: first non-empty of `bom-ref`,
    /// `bomRef`, `purl`, else a synthesized `name@version`. Never persisted
    /// across documents.
    #[must_use]
    pub fn identity_key(&self) -> String {
        non_empty(&self.bom_ref)
            .or_else(|| non_empty(&self.bom_ref_camel))
            .or_else(|| non_empty(&self.purl))
            .map(str::to_owned)
            .unwrap_or_else(|| {
                format!(
                    "{}@{}",
                    self.name.as_deref().unwrap_or(""),
                    self.version.as_deref().unwrap_or("")
                )
            })
    }

    /// Whether the declared scope marks this dependency as non-direct.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        !self.scope.as_deref().is_some_and(|s| {
            s.eq_ignore_ascii_case("optional") || s.eq_ignore_ascii_case("transitive")
        })
    }
}

/// One vulnerability record, as leniently extracted from a raw entry.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawVulnerability {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient_array")]
    pub ratings: Vec<Value>,
    /// Some scanners emit `cvss` instead of `ratings`.
    #[serde(deserialize_with = "lenient_array")]
    pub cvss: Vec<Value>,
    #[serde(deserialize_with = "lenient_array")]
    pub affects: Vec<Value>,
    #[serde(deserialize_with = "lenient_array")]
    pub cwes: Vec<Value>,
    #[serde(deserialize_with = "lenient_array")]
    pub references: Vec<Value>,
    pub analysis: Option<Value>,
}

impl RawVulnerability {
    /// Scoring entries: `ratings` when present, else the `cvss` spelling.
    #[must_use]
    pub fn rating_entries(&self) -> &[Value] {
        if self.ratings.is_empty() {
            &self.cvss
        } else {
            &self.ratings
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Accept an array, degrade anything else (including null) to empty.
fn lenient_array<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

/// Accept a string, degrade anything else (including null) to `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned))
}
