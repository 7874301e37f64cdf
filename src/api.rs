//! Backend API client.
//!
//! Wraps an [`HttpClient`] with the chat backend's REST and streaming
//! endpoints. Every request carries the bearer token when one is
//! configured.

use serde::de::DeserializeOwned;

use crate::error::{classify_http_error, ChatError, ChatResult, NetworkError, StreamError};
use crate::models::{
    Conversation, CreateConversationRequest, Domain, LengthHint, Message, StreamRequest,
    WireMessage,
};
use crate::traits::{ByteStream, Headers, HttpClient, Response};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Client for the chat backend.
#[derive(Debug)]
pub struct ChatApi<C: HttpClient> {
    client: C,
    /// Base URL without a trailing slash
    base_url: String,
    token: Option<String>,
}

impl<C: HttpClient> ChatApi<C> {
    /// Create a client for `base_url` with no bearer token.
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get a reference to the underlying HTTP client.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if let Some(token) = &self.token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    /// Turn a non-2xx response into an error carrying the server's explanation.
    fn ensure_success(response: Response) -> Result<Response, NetworkError> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(NetworkError::HttpStatus {
                status: response.status,
                message: response.error_detail(),
            })
        }
    }

    fn decode<T: DeserializeOwned>(response: &Response, what: &str) -> ChatResult<T> {
        response.json().map_err(|e| ChatError::Decode {
            what: what.to_string(),
            message: e.to_string(),
        })
    }

    async fn get(&self, path: &str) -> ChatResult<Response> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url, &self.headers())
            .await
            .map_err(|e| classify_http_error(e, &url))?;
        Ok(Self::ensure_success(response)?)
    }

    /// Fetch the domain catalog.
    pub async fn list_domains(&self) -> ChatResult<Vec<Domain>> {
        let response = self.get("/api/domains").await?;
        let domains: Vec<Domain> = Self::decode(&response, "domain list")?;
        tracing::debug!(count = domains.len(), "Fetched domains");
        Ok(domains)
    }

    /// List conversations, optionally filtered to one domain.
    pub async fn list_conversations(&self, domain_id: Option<&str>) -> ChatResult<Vec<Conversation>> {
        let path = match domain_id {
            Some(id) => format!("/api/conversations?domain_id={}", urlencoding::encode(id)),
            None => "/api/conversations".to_string(),
        };
        let response = self.get(&path).await?;
        let conversations: Vec<Conversation> = Self::decode(&response, "conversation list")?;
        tracing::debug!(
            domain_id = domain_id.unwrap_or("*"),
            count = conversations.len(),
            "Fetched conversations"
        );
        Ok(conversations)
    }

    /// Create a conversation in `domain_id`.
    pub async fn create_conversation(&self, domain_id: &str, title: &str) -> ChatResult<Conversation> {
        let url = self.url("/api/conversations");
        let body = serde_json::to_string(&CreateConversationRequest {
            domain_id: domain_id.to_string(),
            title: title.to_string(),
        })
        .map_err(|e| ChatError::Decode {
            what: "conversation request".to_string(),
            message: e.to_string(),
        })?;

        let response = self
            .client
            .post(&url, &body, &self.headers())
            .await
            .map_err(|e| classify_http_error(e, &url))?;
        let response = Self::ensure_success(response)?;
        let conversation: Conversation = Self::decode(&response, "conversation")?;
        tracing::info!(conversation_id = %conversation.id, domain_id, "Created conversation");
        Ok(conversation)
    }

    /// Delete a conversation.
    pub async fn delete_conversation(&self, conversation_id: &str) -> ChatResult<()> {
        let url = self.url(&format!(
            "/api/conversations/{}",
            urlencoding::encode(conversation_id)
        ));
        let response = self
            .client
            .delete(&url, &self.headers())
            .await
            .map_err(|e| classify_http_error(e, &url))?;
        Self::ensure_success(response)?;
        tracing::info!(conversation_id, "Deleted conversation");
        Ok(())
    }

    /// Fetch the full message history of a conversation.
    ///
    /// The backend answers with either `{"messages": [...]}` or a bare
    /// array. Records that do not carry a valid role and content are
    /// dropped.
    pub async fn fetch_messages(&self, conversation_id: &str) -> ChatResult<Vec<Message>> {
        let path = format!(
            "/api/conversations/{}/messages",
            urlencoding::encode(conversation_id)
        );
        let response = self.get(&path).await?;
        let body: serde_json::Value = Self::decode(&response, "message list")?;

        let records = match body {
            serde_json::Value::Array(records) => records,
            serde_json::Value::Object(mut object) => match object.remove("messages") {
                Some(serde_json::Value::Array(records)) => records,
                Some(serde_json::Value::Null) | None => Vec::new(),
                Some(_) => {
                    return Err(ChatError::Decode {
                        what: "message list".to_string(),
                        message: "\"messages\" is not an array".to_string(),
                    })
                }
            },
            other => {
                return Err(ChatError::Decode {
                    what: "message list".to_string(),
                    message: format!("unexpected body: {}", other),
                })
            }
        };

        let total = records.len();
        let messages: Vec<Message> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<WireMessage>(record) {
                Ok(wire) => Some(Message::from(wire)),
                Err(e) => {
                    tracing::warn!(
                        conversation_id,
                        index,
                        error = %e,
                        "Dropping malformed message record"
                    );
                    None
                }
            })
            .collect();

        tracing::debug!(
            conversation_id,
            count = messages.len(),
            dropped = total - messages.len(),
            "Fetched messages"
        );
        Ok(messages)
    }

    /// Send a user message and open the streamed reply.
    ///
    /// `Ok(None)` means the backend answered without a body.
    pub async fn open_reply_stream(
        &self,
        conversation_id: &str,
        message: &str,
        hint: LengthHint,
    ) -> Result<Option<ByteStream>, StreamError> {
        let url = self.url(&format!(
            "/api/chat/{}/stream?length={}",
            urlencoding::encode(conversation_id),
            hint.as_str()
        ));
        let body = serde_json::to_string(&StreamRequest::new(message)).map_err(|e| {
            StreamError::OpenFailed {
                message: e.to_string(),
            }
        })?;

        tracing::debug!(conversation_id, length = %hint, "Opening reply stream");
        self.client
            .post_stream(&url, &body, &self.headers())
            .await
            .map_err(|e| StreamError::OpenFailed {
                message: classify_http_error(e, &url).user_message(),
            })
    }
}
