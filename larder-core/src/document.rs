//! Nested key-value document model.
//!
//! A [`Document`] maps top-level field names to arbitrarily nested
//! [`serde_json::Value`]s. The document is the unit of durable persistence:
//! it is encoded and written as one blob, while the cache layer stores its
//! top-level fields as independent entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nested key-value document keyed by top-level field name.
///
/// Values are [`serde_json::Value`] — a closed variant over scalars,
/// sequences, and mappings — so nested traversal is an exhaustive pattern
/// match rather than a runtime type probe.
///
/// Field order is preserved as inserted. No component retains a document
/// after a call returns; ownership stays with the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a top-level field's value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// True if the document contains the top-level field.
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Insert a top-level field, returning the previous value if any.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    /// Remove a top-level field, returning its value if it was present.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Merge another document into this one, last writer wins per top-level
    /// field. Nested values are replaced wholesale, not deep-merged.
    pub fn merge(&mut self, other: Document) {
        for (field, value) in other.fields {
            self.fields.insert(field, value);
        }
    }

    /// Iterate over `(field, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Iterate over top-level field names.
    pub fn field_names(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
