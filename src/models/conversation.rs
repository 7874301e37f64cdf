use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::{deserialize_id, deserialize_lenient_timestamp, deserialize_optional_text};

/// Conversation summary as listed by the backend.
///
/// `title` and `last_message_preview` are optional on the wire; display
/// code goes through the conversation cache rather than reading them
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub domain_id: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub title: Option<String>,
    #[serde(
        default,
        alias = "lastMessage",
        alias = "last_message",
        deserialize_with = "deserialize_optional_text"
    )]
    pub last_message_preview: Option<String>,
    #[serde(default, alias = "firstMessage", deserialize_with = "deserialize_optional_text")]
    pub first_message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Build a bare summary, as used for freshly created conversations.
    pub fn new(id: impl Into<String>, domain_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domain_id: domain_id.into(),
            title: None,
            last_message_preview: None,
            first_message: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Most recent activity, falling back to creation time.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}

/// Body of `POST /api/conversations`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateConversationRequest {
    #[serde(serialize_with = "serialize_numeric_id")]
    pub domain_id: String,
    pub title: String,
}

/// Emit ids that look numeric as JSON numbers, since the backend keys are integers.
fn serialize_numeric_id<S: Serializer>(id: &str, serializer: S) -> Result<S::Ok, S::Error> {
    match id.parse::<i64>() {
        Ok(number) => serializer.serialize_i64(number),
        Err(_) => serializer.serialize_str(id),
    }
}
