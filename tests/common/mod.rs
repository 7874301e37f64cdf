//! Common test utilities for integration tests.
//!
//! This module provides JSON fixtures in the backend's wire shape and a
//! builder that wires a session controller to mock HTTP and storage.
//!
//! # Example
//!
//! ```ignore
//! use common::{TestSessionBuilder, conversation_json};
//!
//! let session = TestSessionBuilder::new()
//!     .with_conversations("1", json!([conversation_json("c1", "1", None)]))
//!     .build();
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;

use domchat::api::ChatApi;
use domchat::models::Domain;
use domchat::selection::LastSelectionStore;
use domchat::session::ConversationSessionController;
use serde_json::{json, Value};

pub type TestSession = ConversationSessionController<MockHttpClient>;

/// A domain record as served by `GET /api/domains`.
pub fn domain_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{} questions", name),
        "system_prompt": format!("You are a {} expert.", name.to_lowercase()),
        "icon": name.to_lowercase(),
    })
}

/// A conversation record as served by `GET /api/conversations`.
pub fn conversation_json(id: &str, domain_id: &str, title: Option<&str>) -> Value {
    json!({
        "id": id,
        "domain_id": domain_id,
        "title": title,
        "user_id": 7,
        "created_at": "2024-03-01T10:00:00",
        "updated_at": "2024-03-01T10:05:00",
    })
}

/// A message record as served by `GET /api/conversations/{id}/messages`.
pub fn message_json(id: u64, role: &str, content: &str) -> Value {
    json!({
        "id": id,
        "role": role,
        "content": content,
        "created_at": "2024-03-01T10:01:00",
    })
}

/// A user/assistant exchange in a `{"messages": [...]}` envelope.
pub fn exchange_json(question: &str, answer: &str) -> Value {
    json!({
        "messages": [
            message_json(1, "user", question),
            message_json(2, "assistant", answer),
        ]
    })
}

pub fn test_domain(id: &str) -> Domain {
    let value = domain_json(id.parse().unwrap_or(1), "Finance");
    let mut domain: Domain = serde_json::from_value(value).unwrap();
    domain.id = id.to_string();
    domain
}

/// Builder for session controllers backed by mocks.
///
/// The mocks are shared handles, so tests keep their own clones to script
/// responses and inspect requests after the controller is built.
pub struct TestSessionBuilder {
    http: MockHttpConfig,
    store: InMemoryKeyValueStore,
    concurrency: Option<usize>,
}

impl TestSessionBuilder {
    pub fn new() -> Self {
        Self {
            http: MockHttpConfig::new(),
            store: InMemoryKeyValueStore::new(),
            concurrency: None,
        }
    }

    pub fn with_conversations(mut self, domain_id: &str, conversations: Value) -> Self {
        self.http = self.http.with_conversations(domain_id, conversations);
        self
    }

    pub fn with_messages(mut self, conversation_id: &str, messages: Value) -> Self {
        self.http = self.http.with_messages(conversation_id, messages);
        self
    }

    pub fn with_last_selection(self, domain_id: &str, conversation_id: &str) -> Self {
        self.store
            .seed(&format!("lastConversation_{}", domain_id), conversation_id);
        self
    }

    pub fn with_backfill_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Builds the controller and returns it with handles to its mocks.
    pub fn build_with_mocks(self) -> (TestSession, MockHttpClient, InMemoryKeyValueStore) {
        let client = self.http.build();
        let api = ChatApi::new(client.clone(), BASE);
        let selections = LastSelectionStore::new(Arc::new(self.store.clone()));
        let mut session = ConversationSessionController::new(Arc::new(api), selections);
        if let Some(concurrency) = self.concurrency {
            session = session.with_backfill_concurrency(concurrency);
        }
        (session, client, self.store)
    }

    pub fn build(self) -> TestSession {
        self.build_with_mocks().0
    }
}

impl Default for TestSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_deserialize() {
        let domain = test_domain("4");
        assert_eq!(domain.id, "4");
        assert!(domain.is_specialized());
    }

    #[test]
    fn test_builder_default_session_is_empty() {
        let session = TestSessionBuilder::new().build();
        assert!(session.state().conversations.is_empty());
        assert!(session.state().selected_domain.is_none());
    }
}
