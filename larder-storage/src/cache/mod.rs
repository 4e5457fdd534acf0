//! Cache layer: namespaced keys, pluggable backends, and the cache-aside
//! orchestrator.
//!
//! # Design
//!
//! The cache holds the document's top-level fields as independent entries —
//! a decomposition — while the durable store holds the composed whole. All
//! entries live under one namespace prefix ([`KeyCodec`]), which doubles as
//! the enumeration and invalidation handle: there is no separate index.
//!
//! Population is lazy and all-or-nothing. A cold read fetches the document
//! from durable storage and commits every field's entry as one batch; a warm
//! read is assembled entirely from the cache. Writes never update the cache;
//! staleness persists until an explicit clear.
//!
//! # Example
//!
//! ```ignore
//! use larder_storage::cache::{CacheAsideStore, MemoryCacheStore};
//! use larder_storage::codec::JsonCodec;
//! use larder_storage::durable::MemoryDurableStore;
//!
//! let store = CacheAsideStore::new(
//!     Arc::new(MemoryCacheStore::new()),
//!     Arc::new(MemoryDurableStore::new()),
//!     JsonCodec::new(),
//! );
//! store.write(&document).await?;
//! let value = store.read_path("billing.plan").await?;
//! ```

pub mod aside;
pub mod lmdb_backend;
pub mod memory_backend;
pub mod namespace_key;
pub mod traits;

pub use aside::{AsideConfig, CacheAsideStore, ClearOutcome};
pub use lmdb_backend::{LmdbCacheError, LmdbCacheStore};
pub use memory_backend::MemoryCacheStore;
pub use namespace_key::{KeyCodec, NAMESPACE};
pub use traits::{CacheStats, CacheStore};
