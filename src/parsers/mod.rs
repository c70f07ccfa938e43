//! Document decoding and shape validation.
//!
//! The pipeline does not care how documents arrive, only that each one can
//! be parsed as JSON and loosely matches the CycloneDX shape. Documents
//! failing that bar are rejected with an error the caller downgrades to a
//! per-document skip; they never abort sibling documents.

mod cyclonedx;

pub use cyclonedx::{CycloneDxDocument, RawComponent, RawVulnerability};

use crate::error::{DocumentErrorKind, Result, TriageError};
use serde_json::Value;

/// Keys whose presence marks a document as plausibly CycloneDX.
const SIGNAL_KEYS: [&str; 4] = ["bomFormat", "specVersion", "components", "vulnerabilities"];

/// Decode raw bytes into a [`CycloneDxDocument`].
///
/// Fails with a document error when the bytes are not valid JSON or decode
/// to a non-object, and with a validation error when the object carries no
/// CycloneDX signal at all (none of `bomFormat`, `specVersion`,
/// `components`, `vulnerabilities`). Within a valid document, individual
/// fields degrade to defaults rather than failing.
pub fn parse_document(bytes: &[u8]) -> Result<CycloneDxDocument> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| {
        TriageError::document(
            "decoding document bytes",
            DocumentErrorKind::InvalidJson(e.to_string()),
        )
    })?;

    let Some(object) = value.as_object() else {
        return Err(TriageError::document(
            "decoding document bytes",
            DocumentErrorKind::NotAnObject,
        ));
    };

    if !SIGNAL_KEYS.iter().any(|key| object.contains_key(*key)) {
        return Err(TriageError::validation(
            "no CycloneDX signal: expected one of bomFormat, specVersion, components, vulnerabilities",
        ));
    }

    // Lenient field handling means an object can no longer fail here, but
    // the error path is kept for forward compatibility of the raw structs.
    serde_json::from_value(value).map_err(|e| {
        TriageError::document(
            "decoding CycloneDX fields",
            DocumentErrorKind::InvalidJson(e.to_string()),
        )
    })
}
