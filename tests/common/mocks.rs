//! Mock configurations for test fixtures.
//!
//! This module re-exports the mock implementations from `domchat::adapters::mock`
//! and wraps them in small builders for the backend routes the session uses.

pub use domchat::adapters::mock::http::RecordedRequest;
pub use domchat::adapters::mock::{InMemoryKeyValueStore, MockHttpClient, MockResponse};
pub use domchat::traits::{Headers, HttpClient, HttpError, Response};

use domchat::models::LengthHint;
use serde_json::Value;

/// Base URL every mock route is registered under.
pub const BASE: &str = "http://test";

pub fn domains_url() -> String {
    format!("{}/api/domains", BASE)
}

pub fn conversations_url(domain_id: &str) -> String {
    format!("{}/api/conversations?domain_id={}", BASE, domain_id)
}

pub fn create_conversation_url() -> String {
    format!("{}/api/conversations", BASE)
}

pub fn conversation_url(conversation_id: &str) -> String {
    format!("{}/api/conversations/{}", BASE, conversation_id)
}

pub fn messages_url(conversation_id: &str) -> String {
    format!("{}/api/conversations/{}/messages", BASE, conversation_id)
}

pub fn stream_url(conversation_id: &str, hint: LengthHint) -> String {
    format!(
        "{}/api/chat/{}/stream?length={}",
        BASE,
        conversation_id,
        hint.as_str()
    )
}

/// Configuration for setting up mock backend routes.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    pub fn with_domains(self, domains: Value) -> Self {
        self.client
            .set_response(&domains_url(), MockResponse::json(200, domains));
        self
    }

    pub fn with_conversations(self, domain_id: &str, conversations: Value) -> Self {
        self.client.set_response(
            &conversations_url(domain_id),
            MockResponse::json(200, conversations),
        );
        self
    }

    pub fn with_messages(self, conversation_id: &str, messages: Value) -> Self {
        self.client.set_response(
            &messages_url(conversation_id),
            MockResponse::json(200, messages),
        );
        self
    }

    /// Configures a server error for a URL.
    #[allow(dead_code)]
    pub fn with_error_response(self, url: &str, status: u16, message: &str) -> Self {
        self.client.set_response(
            url,
            MockResponse::Error(HttpError::ServerError {
                status,
                message: message.to_string(),
            }),
        );
        self
    }

    /// Builds the configured MockHttpClient.
    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}
