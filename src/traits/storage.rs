//! Durable key-value storage abstraction.
//!
//! Only small strings are stored here (the last active conversation per
//! domain); the trait keeps the controller independent of where they live.

use async_trait::async_trait;

use crate::error::StorageError;

/// Trait for durable string key-value storage.
///
/// Implementations include [`FileKeyValueStore`](crate::adapters::FileKeyValueStore)
/// (a JSON file under the data directory) and
/// [`InMemoryKeyValueStore`](crate::adapters::mock::InMemoryKeyValueStore) for tests.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Returns
    /// - `Ok(Some(value))` if the key is present
    /// - `Ok(None)` if it was never set or has been removed
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
