/// Key-value persistence for wallets, settings and activity history
///
/// Every value is a JSON blob stored under one of the keys in
/// `crate::constants` (`wallets`, `settings`, `activities`). Three backends
/// share the `KvStore` trait:
/// - `JsonFileStore`: one pretty-printed JSON object on disk
/// - `SqliteStore`: a single `kv` table
/// - `MemoryStore`: in-process map, used by tests and dry runs
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::config::StorageConfig;
use crate::errors::StorageError;
use crate::logger::{self, LogTag};

pub mod json_file;
pub mod memory;
pub mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

// =============================================================================
// STORE TRAIT
// =============================================================================

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Raw JSON text stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// TYPED HELPERS
// =============================================================================

/// Read and decode a JSON value. Malformed blobs are an error.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key).await? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Read a JSON value, falling back to `T::default()` when it is missing or
/// unreadable. Storage I/O errors still propagate.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(
    store: &dyn KvStore,
    key: &str,
) -> Result<T, StorageError> {
    match load_json::<T>(store, key).await {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Ok(T::default()),
        Err(StorageError::Serialization(e)) => {
            logger::warning(
                LogTag::Storage,
                &format!("Discarding unreadable '{}' blob: {}", key, e),
            );
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

pub async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text).await
}

// =============================================================================
// BACKEND SELECTION
// =============================================================================

/// Open the backend named in the storage configuration inside `data_dir`
pub async fn open_store(
    config: &StorageConfig,
    data_dir: &Path,
) -> Result<Arc<dyn KvStore>, StorageError> {
    let store: Arc<dyn KvStore> = match config.backend.to_lowercase().as_str() {
        "sqlite" => Arc::new(SqliteStore::open(&data_dir.join("store.db"))?),
        "memory" => Arc::new(MemoryStore::new()),
        "json" => Arc::new(JsonFileStore::open(&data_dir.join("store.json")).await?),
        other => {
            logger::warning(
                LogTag::Storage,
                &format!("Unknown storage backend '{}', using json", other),
            );
            Arc::new(JsonFileStore::open(&data_dir.join("store.json")).await?)
        }
    };

    logger::debug(
        LogTag::Storage,
        &format!("Opened '{}' store in {}", config.backend, data_dir.display()),
    );
    Ok(store)
}
