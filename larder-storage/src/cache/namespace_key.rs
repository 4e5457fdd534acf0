//! Namespaced cache-key codec.
//!
//! Every cache entry belonging to the document's decomposition lives under a
//! single namespace prefix. The prefix is both the key-construction rule and
//! the enumeration handle: scanning `<namespace>::*` yields exactly the
//! decomposition's keys, so no separate index is kept.

/// Default namespace for cached document fields.
pub const NAMESPACE: &str = "service_data";

/// Separator between the namespace and the field name.
const SEPARATOR: &str = "::";

/// Bijective mapping between top-level field names and cache keys.
///
/// The namespace is fixed at construction, so changing it is a single-point
/// configuration, not a multi-site edit. `decode` is only defined for keys
/// produced by `encode`; the scan discipline guarantees nothing else is
/// ever handed to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCodec {
    prefix: String,
}

impl KeyCodec {
    /// Key codec scoped to the given namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        let mut prefix = namespace.into();
        prefix.push_str(SEPARATOR);
        Self { prefix }
    }

    /// The namespace this codec scopes keys to.
    pub fn namespace(&self) -> &str {
        &self.prefix[..self.prefix.len() - SEPARATOR.len()]
    }

    /// Cache key for a top-level field name.
    pub fn encode(&self, field: &str) -> String {
        format!("{}{}", self.prefix, field)
    }

    /// Field name for a cache key produced by [`encode`](Self::encode).
    ///
    /// Returns `None` for keys outside the namespace.
    pub fn decode<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.prefix.as_str())
    }

    /// Scan pattern matching every key in the namespace.
    pub fn scan_pattern(&self) -> String {
        format!("{}*", self.prefix)
    }

    /// True if `key` belongs to this namespace.
    pub fn matches(&self, key: &str) -> bool {
        key.starts_with(self.prefix.as_str())
    }
}

impl Default for KeyCodec {
    fn default() -> Self {
        Self::new(NAMESPACE)
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        /// Property: decode(encode(field)) == field for any field name.
        #[test]
        fn prop_encode_decode_roundtrip(field in "[a-zA-Z0-9_.-]{0,32}") {
            let codec = KeyCodec::default();
            let key = codec.encode(&field);
            prop_assert_eq!(codec.decode(&key), Some(field.as_str()));
        }

        /// Property: every encoded key matches the scan pattern used for
        /// population checks and clearing.
        #[test]
        fn prop_encoded_keys_match_scan_pattern(field in "[a-zA-Z0-9_.-]{0,32}") {
            let codec = KeyCodec::default();
            let key = codec.encode(&field);
            let prefix = codec.scan_pattern();
            let prefix = prefix.trim_end_matches('*');
            prop_assert!(key.starts_with(prefix));
            prop_assert!(codec.matches(&key));
        }

        /// Property: encoding is injective for field names free of the
        /// separator sequence.
        #[test]
        fn prop_encoding_is_injective(
            field_a in "[a-zA-Z0-9_-]{0,24}",
            field_b in "[a-zA-Z0-9_-]{0,24}",
        ) {
            let codec = KeyCodec::default();
            if field_a == field_b {
                prop_assert_eq!(codec.encode(&field_a), codec.encode(&field_b));
            } else {
                prop_assert_ne!(codec.encode(&field_a), codec.encode(&field_b));
            }
        }

        /// Property: keys from a different namespace never decode.
        #[test]
        fn prop_foreign_namespace_never_decodes(field in "[a-zA-Z0-9_-]{0,24}") {
            let blue = KeyCodec::new("blue");
            let green = KeyCodec::new("green");
            let key = blue.encode(&field);
            prop_assert_eq!(green.decode(&key), None);
        }
    }
}
