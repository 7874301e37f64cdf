//! JSON-file backed key-value store.
//!
//! Persists small string values to `~/.domchat/state.json` so they
//! survive restarts of the client.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::traits::KeyValueStore;

/// The data directory name under the home directory.
pub const DATA_DIR: &str = ".domchat";

/// The store file name inside the data directory.
const STORE_FILE: &str = "state.json";

/// Key-value store persisted as one JSON object on disk.
///
/// Every write rewrites the whole file; the lock serializes
/// read-modify-write cycles within one process.
#[derive(Debug)]
pub struct FileKeyValueStore {
    /// Path to the store file.
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Create a store under `~/.domchat`.
    pub fn new() -> Result<Self, StorageError> {
        let home = dirs::home_dir().ok_or(StorageError::NoDataDirectory)?;
        Ok(Self::in_dir(home.join(DATA_DIR)))
    }

    /// Create a store inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::with_path(dir.as_ref().join(STORE_FILE))
    }

    /// Create a store backed by an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Get the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Load the map for a write; a corrupt file is replaced rather than
    /// blocking every future write.
    async fn load_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.load().await {
            Err(err @ StorageError::Corrupt { .. }) => {
                tracing::warn!(error = %err, "Discarding corrupt store file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    async fn save(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let json = serde_json::to_vec_pretty(map).map_err(|e| StorageError::Other(e.to_string()))?;
        tokio::fs::write(&self.path, json).await.map_err(io_err)
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.load_for_write().await?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.load_for_write().await?;
        if map.remove(key).is_some() {
            self.save(&map).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::in_dir(temp_dir.path());
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_creates_directory_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join(DATA_DIR);
        let store = FileKeyValueStore::in_dir(&dir);

        store.set("lastConversation_1", "42").await.unwrap();
        assert!(store.path().exists());

        let reopened = FileKeyValueStore::in_dir(&dir);
        assert_eq!(
            reopened.get("lastConversation_1").await.unwrap(),
            Some("42".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove_only_touches_one_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::in_dir(temp_dir.path());
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();

        store.remove("a").await.unwrap();
        store.remove("missing").await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_corrupt_file_reports_then_recovers_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::in_dir(temp_dir.path());
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(
            store.get("a").await,
            Err(StorageError::Corrupt { .. })
        ));

        store.set("a", "1").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some("1".to_string()));
    }
}
