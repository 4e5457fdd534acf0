//! Injected serialization capability for documents and field values.
//!
//! The durable store holds one encoded document; the cache holds one encoded
//! value per top-level field. Both go through the same codec so the two
//! representations cannot drift.

use larder_core::{CodecError, Document};
use serde_json::Value;

/// Encode/decode capability consumed by the storage layer.
///
/// Implementations must round-trip a nested mapping of arbitrary depth
/// containing scalars, nested mappings, and sequences.
pub trait DocumentCodec: Send + Sync {
    /// Encode a whole document for the durable store.
    fn encode_document(&self, document: &Document) -> Result<Vec<u8>, CodecError>;

    /// Decode a whole document read back from the durable store.
    fn decode_document(&self, bytes: &[u8]) -> Result<Document, CodecError>;

    /// Encode a single field value for a cache entry.
    fn encode_value(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Decode a single cache entry back into a field value.
    fn decode_value(&self, bytes: &[u8]) -> Result<Value, CodecError>;
}

/// JSON codec backed by serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact JSON codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printing codec, for durable blobs that get inspected by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl DocumentCodec for JsonCodec {
    fn encode_document(&self, document: &Document) -> Result<Vec<u8>, CodecError> {
        let result = if self.pretty {
            serde_json::to_vec_pretty(document)
        } else {
            serde_json::to_vec(document)
        };
        result.map_err(|e| CodecError::Encode {
            reason: e.to_string(),
        })
    }

    fn decode_document(&self, bytes: &[u8]) -> Result<Document, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode {
            reason: e.to_string(),
        })
    }

    fn encode_value(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode {
            reason: e.to_string(),
        })
    }

    fn decode_value(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode {
            reason: e.to_string(),
        })
    }
}
