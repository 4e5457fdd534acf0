//! LMDB-backed cache store.
//!
//! Uses the heed crate (Rust bindings for LMDB) to provide a persistent,
//! memory-mapped key-value cache that survives process restarts.
//!
//! # Key Space
//!
//! Namespaced string keys (`service_data::<field>`) map directly to LMDB
//! keys. LMDB stores keys in sorted order, so a prefix scan walks a
//! contiguous range of the key space.
//!
//! # Thread Safety
//!
//! LMDB provides ACID transactions. The backend uses read transactions for
//! `get`/`scan_prefix` and a single write transaction per `set`, `set_many`,
//! and `delete_many`, so a batch commits as one unit.

use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;
use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};
use larder_core::{LarderResult, StoreError};

use super::traits::{pattern_prefix, CacheStore};

/// Error type for LMDB cache operations.
#[derive(Debug, thiserror::Error)]
pub enum LmdbCacheError {
    /// Failed to open or create the LMDB environment.
    #[error("Failed to open LMDB environment: {0}")]
    EnvOpen(String),

    /// Failed to open the database within the environment.
    #[error("Failed to open database: {0}")]
    DbOpen(String),

    /// Transaction error.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LmdbCacheError> for larder_core::LarderError {
    fn from(e: LmdbCacheError) -> Self {
        StoreError::Cache {
            reason: e.to_string(),
        }
        .into()
    }
}

/// LMDB-backed cache store.
///
/// # Example
///
/// ```ignore
/// use larder_storage::cache::LmdbCacheStore;
///
/// let store = LmdbCacheStore::new("/var/cache/larder", 100)?;
/// store.set("service_data::billing", encoded).await?;
/// let keys = store.scan_prefix("service_data::*").await?;
/// ```
pub struct LmdbCacheStore {
    /// The LMDB environment.
    env: Env,
    /// The main database (single unnamed database).
    db: Database<Str, Bytes>,
}

impl LmdbCacheStore {
    /// Open (or create) an LMDB cache store.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `max_size_mb` - Maximum size of the database in megabytes
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the LMDB
    /// environment cannot be opened, or the database cannot be created.
    pub fn new<P: AsRef<Path>>(path: P, max_size_mb: usize) -> Result<Self, LmdbCacheError> {
        std::fs::create_dir_all(&path)?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| LmdbCacheError::EnvOpen(e.to_string()))?;

        let mut wtxn = env
            .write_txn()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        let db: Database<Str, Bytes> = env
            .create_database(&mut wtxn, None)
            .map_err(|e| LmdbCacheError::DbOpen(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        Ok(Self { env, db })
    }

    /// Iterate over keys matching a prefix and collect them.
    fn collect_keys_with_prefix(&self, prefix: &str) -> Result<BTreeSet<String>, LmdbCacheError> {
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        let mut keys = BTreeSet::new();
        let iter = self
            .db
            .iter(&rtxn)
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        for result in iter {
            let (key, _) = result.map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;
            if key.starts_with(prefix) {
                keys.insert(key.to_string());
            }
        }

        Ok(keys)
    }
}

#[async_trait]
impl CacheStore for LmdbCacheStore {
    async fn scan_prefix(&self, pattern: &str) -> LarderResult<BTreeSet<String>> {
        Ok(self.collect_keys_with_prefix(pattern_prefix(pattern))?)
    }

    async fn get(&self, key: &str) -> LarderResult<Option<Vec<u8>>> {
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        let value = self
            .db
            .get(&rtxn, key)
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        Ok(value.map(|bytes| bytes.to_vec()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> LarderResult<()> {
        let mut wtxn = self
            .env
            .write_txn()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        self.db
            .put(&mut wtxn, key, &value)
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        Ok(())
    }

    async fn set_many(&self, batch: Vec<(String, Vec<u8>)>) -> LarderResult<()> {
        // Single write transaction: the batch commits atomically.
        let mut wtxn = self
            .env
            .write_txn()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        for (key, value) in &batch {
            self.db
                .put(&mut wtxn, key, value)
                .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;
        }

        wtxn.commit()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> LarderResult<u64> {
        let mut wtxn = self
            .env
            .write_txn()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        let mut removed = 0u64;
        for key in keys {
            let deleted = self
                .db
                .delete(&mut wtxn, key)
                .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;
            if deleted {
                removed += 1;
            }
        }

        wtxn.commit()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (LmdbCacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("TempDir creation should succeed");
        let store =
            LmdbCacheStore::new(temp_dir.path(), 10).expect("store creation should succeed");
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (store, _temp_dir) = create_test_store();

        store
            .set("service_data::a", b"payload".to_vec())
            .await
            .expect("set should succeed");

        assert_eq!(
            store
                .get("service_data::a")
                .await
                .expect("get should succeed"),
            Some(b"payload".to_vec())
        );
        assert_eq!(
            store
                .get("service_data::missing")
                .await
                .expect("get should succeed"),
            None
        );
    }

    #[tokio::test]
    async fn test_scan_prefix_is_namespace_scoped() {
        let (store, _temp_dir) = create_test_store();

        store
            .set("service_data::a", b"1".to_vec())
            .await
            .expect("set should succeed");
        store
            .set("service_data::b", b"2".to_vec())
            .await
            .expect("set should succeed");
        store
            .set("unrelated::c", b"3".to_vec())
            .await
            .expect("set should succeed");

        let keys = store
            .scan_prefix("service_data::*")
            .await
            .expect("scan should succeed");

        assert_eq!(keys.len(), 2);
        assert!(keys.contains("service_data::a"));
        assert!(keys.contains("service_data::b"));
    }

    #[tokio::test]
    async fn test_set_many_commits_as_unit() {
        let (store, _temp_dir) = create_test_store();

        store
            .set_many(vec![
                ("service_data::x".to_string(), b"1".to_vec()),
                ("service_data::y".to_string(), b"2".to_vec()),
                ("service_data::z".to_string(), b"3".to_vec()),
            ])
            .await
            .expect("set_many should succeed");

        let keys = store
            .scan_prefix("service_data::*")
            .await
            .expect("scan should succeed");
        assert_eq!(keys.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_many_counts_existing() {
        let (store, _temp_dir) = create_test_store();

        store
            .set("service_data::a", b"1".to_vec())
            .await
            .expect("set should succeed");

        let removed = store
            .delete_many(&["service_data::a".to_string(), "service_data::b".to_string()])
            .await
            .expect("delete_many should succeed");

        assert_eq!(removed, 1);
        let keys = store
            .scan_prefix("service_data::*")
            .await
            .expect("scan should succeed");
        assert!(keys.is_empty());
    }

    #[tokio::test]
    async fn test_overwrite() {
        let (store, _temp_dir) = create_test_store();

        store
            .set("service_data::a", b"old".to_vec())
            .await
            .expect("set should succeed");
        store
            .set("service_data::a", b"new".to_vec())
            .await
            .expect("set should succeed");

        assert_eq!(
            store
                .get("service_data::a")
                .await
                .expect("get should succeed"),
            Some(b"new".to_vec())
        );
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let temp_dir = TempDir::new().expect("TempDir creation should succeed");

        {
            let store = LmdbCacheStore::new(temp_dir.path(), 10)
                .expect("store creation should succeed");
            store
                .set("service_data::persist", b"still here".to_vec())
                .await
                .expect("set should succeed");
        }

        let reopened =
            LmdbCacheStore::new(temp_dir.path(), 10).expect("store creation should succeed");
        assert_eq!(
            reopened
                .get("service_data::persist")
                .await
                .expect("get should succeed"),
            Some(b"still here".to_vec())
        );
    }
}
