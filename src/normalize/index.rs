//! Component lookup table for one document.

use crate::parsers::RawComponent;
use indexmap::IndexMap;
use serde_json::Value;

/// Lookup table from identity key to declared component.
///
/// Built and consumed within the scope of a single document; keys are never
/// persisted across documents.
#[derive(Debug, Default)]
pub struct ComponentIndex {
    entries: IndexMap<String, RawComponent>,
}

impl ComponentIndex {
    /// Build the index from a document's raw component entries.
    ///
    /// Non-object entries are ignored (they still count toward the declared
    /// component total, which uses the raw array length). Colliding keys are
    /// overwritten last-write-wins: documents are assumed not to declare
    /// true duplicates, so this guards against malformed input rather than
    /// failing.
    #[must_use]
    pub fn build(components: &[Value]) -> Self {
        let mut entries = IndexMap::new();
        for value in components {
            let Some(component) = RawComponent::from_value(value) else {
                continue;
            };
            let key = component.identity_key();
            if entries.insert(key.clone(), component).is_some() {
                tracing::debug!(key = %key, "component identity key collision, keeping later entry");
            }
        }
        Self { entries }
    }

    /// Look up a component by ref. A miss is not an error; dangling refs
    /// degrade to an unmatched finding.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawComponent> {
        self.entries.get(key)
    }

    /// Number of indexed (well-formed) components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
