//! Durable "last selected conversation" pointer per domain.

use std::sync::Arc;

use crate::error::StorageError;
use crate::traits::KeyValueStore;

const KEY_PREFIX: &str = "lastConversation_";

/// Remembers which conversation was last active in each domain.
#[derive(Clone)]
pub struct LastSelectionStore {
    store: Arc<dyn KeyValueStore>,
}

impl LastSelectionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(domain_id: &str) -> String {
        format!("{}{}", KEY_PREFIX, domain_id)
    }

    /// Last active conversation in `domain_id`, if one was recorded.
    pub async fn get(&self, domain_id: &str) -> Result<Option<String>, StorageError> {
        let value = self.store.get(&Self::key(domain_id)).await?;
        Ok(value.filter(|id| !id.trim().is_empty()))
    }

    pub async fn set(&self, domain_id: &str, conversation_id: &str) -> Result<(), StorageError> {
        self.store.set(&Self::key(domain_id), conversation_id).await?;
        tracing::debug!(domain_id, conversation_id, "Recorded last selection");
        Ok(())
    }

    pub async fn clear(&self, domain_id: &str) -> Result<(), StorageError> {
        self.store.remove(&Self::key(domain_id)).await
    }
}

impl std::fmt::Debug for LastSelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LastSelectionStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::InMemoryKeyValueStore;

    #[tokio::test]
    async fn test_round_trip() {
        let backing = InMemoryKeyValueStore::new();
        let store = LastSelectionStore::new(Arc::new(backing.clone()));

        assert_eq!(store.get("1").await.unwrap(), None);
        store.set("1", "42").await.unwrap();
        assert_eq!(store.get("1").await.unwrap(), Some("42".to_string()));
        assert_eq!(backing.peek("lastConversation_1"), Some("42".to_string()));

        store.clear("1").await.unwrap();
        assert_eq!(store.get("1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_domains_are_independent() {
        let store = LastSelectionStore::new(Arc::new(InMemoryKeyValueStore::new()));
        store.set("1", "a").await.unwrap();
        store.set("2", "b").await.unwrap();
        store.clear("1").await.unwrap();
        assert_eq!(store.get("2").await.unwrap(), Some("b".to_string()));
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let backing = InMemoryKeyValueStore::new();
        backing.set_fail_reads(true);
        let store = LastSelectionStore::new(Arc::new(backing));
        assert!(store.get("1").await.is_err());
    }
}
