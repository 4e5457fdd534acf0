//! Larder Storage - Cache-Aside Access Layer
//!
//! Persists a nested key-value document to a durable blob store and serves
//! reads through a key-value cache that is lazily populated on miss and
//! cleared only on request. The serialization format, cache backend, and
//! durable backend are all injected behind traits.

pub mod cache;
pub mod codec;
pub mod durable;

pub use cache::{
    AsideConfig, CacheAsideStore, CacheStats, CacheStore, ClearOutcome, KeyCodec, LmdbCacheError,
    LmdbCacheStore, MemoryCacheStore, NAMESPACE,
};
pub use codec::{DocumentCodec, JsonCodec};
pub use durable::{DurableStore, FileDurableStore, MemoryDurableStore};
