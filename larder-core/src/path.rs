//! Dotted-path resolution against a document.
//!
//! Paths are `.`-delimited (`server.pool.max`): the first segment selects a
//! top-level field and each further segment descends into a nested mapping.
//! Resolution never fails — an unmatched path is an absent result, not an
//! error.

use serde_json::Value;

use crate::Document;

/// Resolve a dotted path against a document.
///
/// On success, returns a single-entry document keyed by the original path
/// string (not a nested structure). Returns `None` when any segment fails
/// to match. The empty path is absent without inspecting the document.
///
/// A segment that lands on anything but a mapping ends the walk: scalars
/// and sequences have no named children.
pub fn resolve(document: &Document, path: &str) -> Option<Document> {
    if path.is_empty() {
        return None;
    }

    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = document.get(first)?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Array(_) => return None,
        };
    }

    Some(Document::from_iter([(path.to_string(), current.clone())]))
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Property: every top-level field resolves to a single-entry
        /// document keyed by the field name, holding the field's value.
        #[test]
        fn prop_top_level_fields_resolve(
            field in "[a-z][a-z0-9_]{0,15}",
            value in any::<i64>(),
        ) {
            let mut document = Document::new();
            document.insert(field.clone(), json!(value));

            let resolved = resolve(&document, &field);
            prop_assert!(resolved.is_some());
            let resolved = resolved.expect("resolved should be Some");
            prop_assert_eq!(resolved.len(), 1);
            prop_assert_eq!(resolved.get(&field), Some(&json!(value)));
        }

        /// Property: a chain of nested mappings resolves along its full
        /// dotted path, and the result is keyed by the original path.
        #[test]
        fn prop_nested_chain_resolves(
            segments in proptest::collection::vec("[a-z][a-z0-9]{0,7}", 1..5),
            value in any::<bool>(),
        ) {
            // Build {s0: {s1: {... : value}}} from the inside out.
            let mut nested = json!(value);
            for segment in segments.iter().skip(1).rev() {
                let mut map = serde_json::Map::new();
                map.insert(segment.clone(), nested);
                nested = Value::Object(map);
            }
            let mut document = Document::new();
            document.insert(segments[0].clone(), nested);

            let path = segments.join(".");
            let resolved = resolve(&document, &path);
            prop_assert!(resolved.is_some());
            let resolved = resolved.expect("resolved should be Some");
            prop_assert_eq!(
                resolved.get(&path),
                Some(&json!(value))
            );
        }
    }
}
