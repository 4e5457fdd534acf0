//! Error types for larder operations

use thiserror::Error;

/// Serialization capability errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The input document cannot be serialized. Fatal: the caller handed
    /// over something the injected format cannot express.
    #[error("Document cannot be encoded: {reason}")]
    Encode { reason: String },

    /// Persisted or cached bytes cannot be parsed back into a document.
    /// Fatal: the stored data is corrupt or the format changed
    /// incompatibly.
    #[error("Stored bytes cannot be decoded: {reason}")]
    Decode { reason: String },
}

/// Store layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The durable store's single slot holds no document.
    #[error("No document in durable store")]
    NotFound,

    #[error("Cache store operation failed: {reason}")]
    Cache { reason: String },

    #[error("Durable store operation failed: {reason}")]
    Durable { reason: String },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Master error type for all larder errors.
///
/// This layer performs no local recovery: every failure from an adapter or
/// the codec is surfaced to the immediate caller unchanged in kind. Absent
/// path results and empty-cache checks are ordinary return values, never
/// errors.
#[derive(Debug, Clone, Error)]
pub enum LarderError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl LarderError {
    /// True for the durable store's empty-slot signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound))
    }
}

/// Result type alias for larder operations.
pub type LarderResult<T> = Result<T, LarderError>;

// =============================================================================
// TESTS
// =============================================================================
