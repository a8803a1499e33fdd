//! Key-value snapshot storage.
//!
//! Each editor session owns exactly one key holding its JSON snapshot. The
//! store deals in raw strings so that an unreadable snapshot is reported as a
//! parse problem by the caller, not as a storage failure.

pub mod file;
pub mod memory;
pub mod redis;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{Config, StoreBackend};

pub use self::file::FileSnapshotStore;
pub use self::memory::MemorySnapshotStore;
pub use self::redis::RedisSnapshotStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Snapshot could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A single-key-per-session snapshot store. Swap backends via `STORE_BACKEND`.
///
/// Carried in `AppState` as `Arc<dyn SnapshotStore>`.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns the stored payload, or `None` when the key was never written.
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn write(&self, key: &str, payload: &str) -> Result<(), StoreError>;

    /// Deletes the key. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    fn backend_name(&self) -> &'static str;
}

/// Builds the snapshot store selected by configuration.
pub async fn create_store(config: &Config) -> Result<Arc<dyn SnapshotStore>> {
    let store: Arc<dyn SnapshotStore> = match config.store_backend {
        StoreBackend::File => Arc::new(
            FileSnapshotStore::open(&config.snapshot_dir)
                .await
                .with_context(|| {
                    format!(
                        "Could not prepare snapshot directory {}",
                        config.snapshot_dir.display()
                    )
                })?,
        ),
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is required for the redis store")?;
            Arc::new(RedisSnapshotStore::new(url)?)
        }
        StoreBackend::Memory => Arc::new(MemorySnapshotStore::default()),
    };

    info!(backend = store.backend_name(), "Snapshot store initialized");
    Ok(store)
}
