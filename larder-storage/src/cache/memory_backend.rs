//! In-memory cache backend.
//!
//! Lock-guarded map in the same shape as the LMDB backend, for tests and
//! single-process deployments that don't need the cache to survive restarts.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use larder_core::{LarderResult, StoreError};

use super::traits::{pattern_prefix, CacheStore};

/// In-memory cache store.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCacheStore {
    /// Create an empty cache store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    /// True if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn scan_prefix(&self, pattern: &str) -> LarderResult<BTreeSet<String>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        let prefix = pattern_prefix(pattern);
        Ok(entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn get(&self, key: &str) -> LarderResult<Option<Vec<u8>>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> LarderResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn set_many(&self, batch: Vec<(String, Vec<u8>)>) -> LarderResult<()> {
        // One lock region: the batch becomes visible as a unit.
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        for (key, value) in batch {
            entries.insert(key, value);
        }
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> LarderResult<u64> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut removed = 0u64;
        for key in keys {
            if entries.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
