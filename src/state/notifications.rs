use chrono::{DateTime, Utc};

use crate::error::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A transient message for the user, drained by whoever renders the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
    /// What the user can do about an error
    pub hint: Option<String>,
    /// Whether repeating the action may succeed
    pub retryable: bool,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            description: description.into(),
            hint: None,
            retryable: false,
            timestamp: Utc::now(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: description.into(),
            hint: None,
            retryable: false,
            timestamp: Utc::now(),
        }
    }

    /// Error notification for a failed flow, with the error's user message as
    /// detail and its category's recovery hint.
    pub fn from_error(title: impl Into<String>, err: &ChatError) -> Self {
        Self {
            hint: Some(err.recovery_hint().to_string()),
            retryable: err.is_retryable(),
            ..Self::error(title, err.user_message())
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}
