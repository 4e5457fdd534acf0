//! Cache-aside orchestrator.
//!
//! This module implements the core protocol: writes persist the whole
//! document to the durable store, reads are served from the cache and
//! lazily repopulate it on miss, and the cache is only ever emptied by an
//! explicit clear.
//!
//! # Population Contract
//!
//! The cache is all-or-nothing populated: either the namespace holds zero
//! keys (cold) or one entry per top-level field of the last-loaded document
//! (warm). Population stages every encoded entry first and commits them
//! through a single batched write, and cold readers serialize on a
//! population guard, so no partially populated namespace is observable.
//!
//! # Staleness Contract
//!
//! `write` and `merge` never touch the cache. Stale entries persist until
//! [`CacheAsideStore::clear_cache`] runs; callers that need read-after-write
//! freshness must clear explicitly.

use std::sync::{Arc, RwLock};

use larder_core::{path, Document, LarderResult};
use tokio::sync::Mutex;

use super::namespace_key::KeyCodec;
use super::traits::{CacheStats, CacheStore};
use crate::codec::{DocumentCodec, JsonCodec};
use crate::durable::DurableStore;

/// Configuration for the cache-aside store.
#[derive(Debug, Clone)]
pub struct AsideConfig {
    /// Namespace prefix for cache keys.
    pub namespace: String,
}

impl Default for AsideConfig {
    fn default() -> Self {
        Self {
            namespace: super::namespace_key::NAMESPACE.to_string(),
        }
    }
}

impl AsideConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache-key namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// Outcome of an explicit cache clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Matching entries were deleted.
    Cleared {
        /// How many entries were removed.
        entries: u64,
    },
    /// The namespace held no entries; there was nothing to clear.
    Empty,
}

impl ClearOutcome {
    /// True if the clear removed at least one entry.
    pub fn was_cleared(&self) -> bool {
        matches!(self, Self::Cleared { .. })
    }
}

/// Cache-aside access layer over a durable blob store.
///
/// # Type Parameters
///
/// - `C`: The cache store holding the document's decomposed fields
/// - `D`: The durable store holding the composed document blob
/// - `K`: The codec translating between documents and stored bytes
///
/// # Example
///
/// ```ignore
/// let store = CacheAsideStore::new(
///     Arc::new(MemoryCacheStore::new()),
///     Arc::new(FileDurableStore::new("/var/lib/larder/service_data.json")),
///     JsonCodec::new(),
/// );
///
/// store.write(&document).await?;
/// let doc = store.read().await?;                    // populates the cache
/// let hit = store.read_path("billing.plan").await?; // served from cache
/// store.clear_cache().await?;
/// ```
pub struct CacheAsideStore<C, D, K = JsonCodec>
where
    C: CacheStore,
    D: DurableStore,
    K: DocumentCodec,
{
    /// The cache store.
    cache: Arc<C>,
    /// The durable store.
    durable: Arc<D>,
    /// The injected serialization capability.
    codec: Arc<K>,
    /// Key codec for the configured namespace.
    keys: KeyCodec,
    /// Serializes populate-on-miss so cold readers wait for one population.
    populate_lock: Arc<Mutex<()>>,
    /// Read traffic counters.
    stats: Arc<RwLock<CacheStats>>,
}

impl<C, D, K> CacheAsideStore<C, D, K>
where
    C: CacheStore,
    D: DurableStore,
    K: DocumentCodec,
{
    /// Create a new cache-aside store with the default namespace.
    pub fn new(cache: Arc<C>, durable: Arc<D>, codec: K) -> Self {
        Self::with_config(cache, durable, codec, AsideConfig::default())
    }

    /// Create a new cache-aside store with an explicit configuration.
    pub fn with_config(cache: Arc<C>, durable: Arc<D>, codec: K, config: AsideConfig) -> Self {
        Self {
            cache,
            durable,
            codec: Arc::new(codec),
            keys: KeyCodec::new(config.namespace),
            populate_lock: Arc::new(Mutex::new(())),
            stats: Arc::new(RwLock::new(CacheStats::default())),
        }
    }

    /// Get a reference to the cache store.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Get a reference to the durable store.
    pub fn durable(&self) -> &D {
        &self.durable
    }

    /// Get the key codec for this store's namespace.
    pub fn key_codec(&self) -> &KeyCodec {
        &self.keys
    }

    /// Snapshot of the read traffic counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .read()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    // ========================================================================
    // WRITE PATH
    // ========================================================================

    /// Persist a document to the durable store.
    ///
    /// An encode failure is fatal and propagated; nothing is written. The
    /// cache is left untouched — stale entries persist until an explicit
    /// [`clear_cache`](Self::clear_cache).
    pub async fn write(&self, document: &Document) -> LarderResult<()> {
        let bytes = self.codec.encode_document(document)?;
        self.durable.put(bytes).await?;
        tracing::debug!(fields = document.len(), "document persisted to durable store");
        Ok(())
    }

    /// Merge a document into the persisted one, last writer wins per
    /// top-level field, and return the merged result.
    ///
    /// An empty durable slot is treated as an empty document. Like
    /// [`write`](Self::write), this never touches the cache.
    pub async fn merge(&self, document: &Document) -> LarderResult<Document> {
        let mut merged = if self.durable.exists().await? {
            let bytes = self.durable.get().await?;
            self.codec.decode_document(&bytes)?
        } else {
            Document::new()
        };
        merged.merge(document.clone());

        let bytes = self.codec.encode_document(&merged)?;
        self.durable.put(bytes).await?;
        Ok(merged)
    }

    /// Remove a top-level field from both the cache and the persisted
    /// document.
    ///
    /// Returns `false` when there is no persisted document or the field is
    /// absent from it. The cache entry is dropped first, so the cache never
    /// serves a field the durable document no longer has.
    pub async fn remove_field(&self, field: &str) -> LarderResult<bool> {
        self.cache
            .delete_many(&[self.keys.encode(field)])
            .await?;

        if !self.durable.exists().await? {
            return Ok(false);
        }

        let bytes = self.durable.get().await?;
        let mut document = self.codec.decode_document(&bytes)?;
        if document.remove(field).is_none() {
            return Ok(false);
        }

        let encoded = self.codec.encode_document(&document)?;
        self.durable.put(encoded).await?;
        Ok(true)
    }

    // ========================================================================
    // READ PATH
    // ========================================================================

    /// Read the full document through the cache.
    ///
    /// A warm cache serves the read without touching the durable store. A
    /// cold cache fetches the document from durable storage, decodes it
    /// (a decode failure is fatal: the persisted data is corrupt or the
    /// format changed incompatibly), populates one cache entry per
    /// top-level field, and returns the document.
    pub async fn read(&self) -> LarderResult<Document> {
        if let Some(document) = self.load_cached().await? {
            self.record_hit();
            return Ok(document);
        }

        let _guard = self.populate_lock.lock().await;

        // A concurrent cold read may have populated while we waited.
        if let Some(document) = self.load_cached().await? {
            self.record_hit();
            return Ok(document);
        }

        self.record_miss();
        self.populate().await
    }

    /// Read a dotted-path query through the cache.
    ///
    /// Returns a single-entry document keyed by the original path string,
    /// or `None` when the path does not resolve. The empty path is absent
    /// immediately, without any store call.
    pub async fn read_path(&self, path: &str) -> LarderResult<Option<Document>> {
        if path.is_empty() {
            return Ok(None);
        }

        let document = self.read().await?;
        Ok(path::resolve(&document, path))
    }

    /// True if the namespace holds at least one cache entry.
    pub async fn is_populated(&self) -> LarderResult<bool> {
        let keys = self.cache.scan_prefix(&self.keys.scan_pattern()).await?;
        Ok(!keys.is_empty())
    }

    // ========================================================================
    // INVALIDATION
    // ========================================================================

    /// Delete every cache entry in the namespace.
    ///
    /// Backend failure propagates as-is; there is no compensating action.
    pub async fn clear_cache(&self) -> LarderResult<ClearOutcome> {
        let keys = self.cache.scan_prefix(&self.keys.scan_pattern()).await?;
        if keys.is_empty() {
            return Ok(ClearOutcome::Empty);
        }

        let keys: Vec<String> = keys.into_iter().collect();
        let entries = self.cache.delete_many(&keys).await?;
        self.record_clear();
        tracing::debug!(entries, "cache namespace cleared");
        Ok(ClearOutcome::Cleared { entries })
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    /// Assemble the document from the cache, or `None` when cold.
    async fn load_cached(&self) -> LarderResult<Option<Document>> {
        let keys = self.cache.scan_prefix(&self.keys.scan_pattern()).await?;
        if keys.is_empty() {
            return Ok(None);
        }

        let mut document = Document::new();
        for key in keys {
            let field = match self.keys.decode(&key) {
                Some(field) => field,
                None => continue,
            };
            match self.cache.get(&key).await? {
                Some(bytes) => {
                    document.insert(field, self.codec.decode_value(&bytes)?);
                }
                // Entry vanished between scan and get (a concurrent clear):
                // treat the cache as cold.
                None => return Ok(None),
            }
        }

        Ok(Some(document))
    }

    /// Fetch from the durable store and populate the cache.
    async fn populate(&self) -> LarderResult<Document> {
        let bytes = self.durable.get().await?;
        let document = self.codec.decode_document(&bytes)?;

        // Stage every entry before writing any: an encode failure must not
        // leave the namespace half-populated.
        let mut entries = Vec::with_capacity(document.len());
        for (field, value) in document.iter() {
            entries.push((self.keys.encode(field), self.codec.encode_value(value)?));
        }
        self.cache.set_many(entries).await?;

        tracing::debug!(fields = document.len(), "cache populated from durable store");
        Ok(document)
    }

    fn record_hit(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.hits += 1;
        }
    }

    fn record_miss(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.misses += 1;
        }
    }

    fn record_clear(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.clears += 1;
        }
    }
}

impl<C, D, K> Clone for CacheAsideStore<C, D, K>
where
    C: CacheStore,
    D: DurableStore,
    K: DocumentCodec,
{
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            durable: Arc::clone(&self.durable),
            codec: Arc::clone(&self.codec),
            keys: self.keys.clone(),
            populate_lock: Arc::clone(&self.populate_lock),
            stats: Arc::clone(&self.stats),
        }
    }
}
