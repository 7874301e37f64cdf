use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::text_utils::{parse_image_markup, IMAGE_PLACEHOLDER};
use super::{deserialize_id, deserialize_lenient_timestamp};

/// Seeded from wall-clock millis so ids stay distinct across restarts.
static NEXT_LOCAL_ID: Lazy<AtomicU64> = Lazy::new(|| {
    let seed = Utc::now().timestamp_millis().max(0) as u64;
    AtomicU64::new(seed)
});

/// Identity of a message.
///
/// Locally created messages live in their own namespace, so they can
/// never collide with an id the server issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    Server(String),
    Local(u64),
}

impl MessageId {
    /// Allocate a fresh, strictly increasing local id.
    pub fn next_local() -> Self {
        MessageId::Local(NEXT_LOCAL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn is_local(&self) -> bool {
        matches!(self, MessageId::Local(_))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Server(id) => f.write_str(id),
            MessageId::Local(n) => write!(f, "local-{}", n),
        }
    }
}

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// What a message carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    /// Generated image, optionally with the text that came with it
    Image { url: String, caption: Option<String> },
}

impl MessageBody {
    /// Textual part of the body; empty for a caption-less image.
    pub fn text(&self) -> &str {
        match self {
            MessageBody::Text(text) => text,
            MessageBody::Image { caption, .. } => caption.as_deref().unwrap_or(""),
        }
    }
}

/// A message as held in session state.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: MessageRole,
    pub body: MessageBody,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    /// Optimistic user message, shown before the server has seen it.
    pub fn local_user(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::next_local(),
            role: MessageRole::User,
            body: MessageBody::Text(content.into()),
            timestamp: Some(Utc::now()),
        }
    }

    /// Empty assistant message that a streamed reply is written into.
    pub fn placeholder_assistant() -> Self {
        Self {
            id: MessageId::next_local(),
            role: MessageRole::Assistant,
            body: MessageBody::Text(String::new()),
            timestamp: Some(Utc::now()),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    pub fn text(&self) -> &str {
        self.body.text()
    }

    /// Text suitable for a one-line preview.
    pub fn preview_text(&self) -> &str {
        match &self.body {
            MessageBody::Image { caption: None, .. } => IMAGE_PLACEHOLDER,
            body => body.text(),
        }
    }

    /// Append streamed text.
    ///
    /// A streamed reply is plain text until the server's copy replaces it,
    /// so an image body is turned back into text first.
    pub fn append_text(&mut self, chunk: &str) {
        match &mut self.body {
            MessageBody::Text(text) => text.push_str(chunk),
            MessageBody::Image { .. } => {
                let mut text = self.body.text().to_string();
                text.push_str(chunk);
                self.body = MessageBody::Text(text);
            }
        }
    }
}

/// Message record as the backend sends it.
///
/// Older records use different field names for the same data. Either
/// spelling is accepted and the current one wins when both are present.
/// A record without any role or text fails to deserialize and is dropped
/// at the API boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawWireMessage")]
pub struct WireMessage {
    pub id: Option<String>,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Every field the backend has used for a message, before normalising.
#[derive(Deserialize)]
struct RawWireMessage {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    id: Option<String>,
    #[serde(default)]
    role: Option<MessageRole>,
    #[serde(default)]
    sender: Option<MessageRole>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<RawWireMessage> for WireMessage {
    type Error = String;

    fn try_from(raw: RawWireMessage) -> Result<Self, Self::Error> {
        let role = raw
            .role
            .or(raw.sender)
            .ok_or_else(|| "message has neither `role` nor `sender`".to_string())?;
        let content = raw
            .content
            .or(raw.message)
            .ok_or_else(|| "message has neither `content` nor `message`".to_string())?;
        Ok(Self {
            id: raw.id,
            role,
            content,
            timestamp: raw.timestamp.or(raw.created_at),
        })
    }
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Id(#[serde(deserialize_with = "deserialize_id")] String);

    Option::<Id>::deserialize(deserializer).map(|opt| opt.map(|Id(id)| id))
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        let id = match wire.id {
            Some(id) => MessageId::Server(id),
            None => MessageId::next_local(),
        };
        Self {
            id,
            role: wire.role,
            body: parse_image_markup(&wire.content),
            timestamp: wire.timestamp,
        }
    }
}
