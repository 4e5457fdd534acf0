//! Cache store trait and usage counters.
//!
//! This module defines the operations the cache-aside layer needs from the
//! opaque cache backend.

use std::collections::BTreeSet;

use async_trait::async_trait;
use larder_core::LarderResult;

/// Key-value cache backend for pluggable implementations.
///
/// Implementations store opaque bytes under string keys and support
/// enumerating keys by a trailing-wildcard pattern. They perform no
/// interpretation of keys or values; all semantic keying is the
/// [`KeyCodec`]'s job, invoked by the orchestrator, not here.
///
/// [`KeyCodec`]: crate::cache::KeyCodec
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// All keys matching a `prefix*` pattern.
    async fn scan_prefix(&self, pattern: &str) -> LarderResult<BTreeSet<String>>;

    /// Value stored under `key`, if any.
    async fn get(&self, key: &str) -> LarderResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, overwriting any previous entry.
    async fn set(&self, key: &str, value: Vec<u8>) -> LarderResult<()>;

    /// Store a batch of entries.
    ///
    /// Backends that can commit the batch in one step must do so: the
    /// population path relies on the batch becoming visible as a unit.
    async fn set_many(&self, entries: Vec<(String, Vec<u8>)>) -> LarderResult<()> {
        for (key, value) in entries {
            self.set(&key, value).await?;
        }
        Ok(())
    }

    /// Delete every key in `keys`, returning how many existed.
    async fn delete_many(&self, keys: &[String]) -> LarderResult<u64>;
}

/// Literal prefix denoted by a trailing-wildcard scan pattern.
///
/// `service_data::*` scans for keys starting with `service_data::`; a
/// pattern without a trailing `*` matches as a plain prefix.
pub(crate) fn pattern_prefix(pattern: &str) -> &str {
    pattern.strip_suffix('*').unwrap_or(pattern)
}

/// Counters for cache-aside read traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads served entirely from the cache.
    pub hits: u64,
    /// Reads that fell through to the durable store and repopulated.
    pub misses: u64,
    /// Explicit clears that removed at least one entry.
    pub clears: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.8).abs() < 0.001);

        let empty_stats = CacheStats::default();
        assert!((empty_stats.hit_rate() - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_pattern_prefix() {
        assert_eq!(pattern_prefix("service_data::*"), "service_data::");
        assert_eq!(pattern_prefix("service_data::"), "service_data::");
        assert_eq!(pattern_prefix("*"), "");
    }
}
