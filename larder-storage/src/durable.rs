//! Durable blob store trait and backends.
//!
//! Single-slot semantics: the store holds exactly one logical document,
//! addressed implicitly. No versioning, no conditional writes, no listing —
//! this matches the service-wide config blob the layer fronts.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use larder_core::{LarderResult, StoreError};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Single-slot durable blob store.
///
/// Operates on the encoded document; interpretation belongs to the codec,
/// driven by the orchestrator.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read the stored document blob.
    ///
    /// Fails with [`StoreError::NotFound`] when the slot is empty.
    async fn get(&self) -> LarderResult<Vec<u8>>;

    /// Replace the stored document blob.
    async fn put(&self, bytes: Vec<u8>) -> LarderResult<()>;

    /// True if a document blob exists in the slot.
    async fn exists(&self) -> LarderResult<bool>;
}

// ============================================================================
// IN-MEMORY BACKEND
// ============================================================================

/// In-memory durable store for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryDurableStore {
    slot: RwLock<Option<Vec<u8>>>,
}

impl MemoryDurableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DurableStore for MemoryDurableStore {
    async fn get(&self) -> LarderResult<Vec<u8>> {
        let slot = self.slot.read().map_err(|_| StoreError::LockPoisoned)?;
        match slot.as_ref() {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(StoreError::NotFound.into()),
        }
    }

    async fn put(&self, bytes: Vec<u8>) -> LarderResult<()> {
        let mut slot = self.slot.write().map_err(|_| StoreError::LockPoisoned)?;
        *slot = Some(bytes);
        Ok(())
    }

    async fn exists(&self) -> LarderResult<bool> {
        let slot = self.slot.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(slot.is_some())
    }
}

// ============================================================================
// FILESYSTEM BACKEND
// ============================================================================

/// Filesystem durable store: one blob file on local disk.
pub struct FileDurableStore {
    path: PathBuf,
}

impl FileDurableStore {
    /// Durable store backed by the file at `path`.
    ///
    /// The file is created on the first `put`; parent directories are
    /// created as needed.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn durable_io(e: std::io::Error) -> StoreError {
    StoreError::Durable {
        reason: e.to_string(),
    }
}

#[async_trait]
impl DurableStore for FileDurableStore {
    async fn get(&self) -> LarderResult<Vec<u8>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound.into())
            }
            Err(e) => Err(durable_io(e).into()),
        }
    }

    async fn put(&self, bytes: Vec<u8>) -> LarderResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(durable_io)?;
        }

        let mut file = fs::File::create(&self.path).await.map_err(durable_io)?;
        file.write_all(&bytes).await.map_err(durable_io)?;
        file.flush().await.map_err(durable_io)?;
        Ok(())
    }

    async fn exists(&self) -> LarderResult<bool> {
        fs::try_exists(&self.path)
            .await
            .map_err(|e| durable_io(e).into())
    }
}
