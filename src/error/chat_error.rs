//! Unified error type for domchat.
//!
//! `ChatError` consolidates the domain-specific error types so every flow
//! boundary can categorize, log and surface failures the same way.

use std::fmt;

use super::category::ErrorCategory;
use super::network::NetworkError;
use super::storage::StorageError;
use super::stream::StreamError;

/// Unified error type for domchat.
#[derive(Debug)]
pub enum ChatError {
    /// Network-related errors (connections, HTTP status, bodies).
    Network(NetworkError),

    /// Errors while reading a streamed reply.
    Stream(StreamError),

    /// Durable key-value storage errors.
    Storage(StorageError),

    /// A payload could not be decoded.
    Decode { what: String, message: String },

    /// An operation referred to something the session does not know.
    NotFound { what: String, id: String },
}

impl ChatError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Network(NetworkError::HttpStatus { status: 401, .. }) => {
                ErrorCategory::Auth
            }
            ChatError::Network(NetworkError::HttpStatus { status, .. }) if *status >= 500 => {
                ErrorCategory::Server
            }
            ChatError::Network(NetworkError::HttpStatus { .. }) => ErrorCategory::Client,
            ChatError::Network(_) => ErrorCategory::Network,
            ChatError::Stream(StreamError::OpenFailed { .. }) => ErrorCategory::Network,
            ChatError::Stream(_) => ErrorCategory::Server,
            ChatError::Storage(_) => ErrorCategory::System,
            ChatError::Decode { .. } => ErrorCategory::Client,
            ChatError::NotFound { .. } => ErrorCategory::Client,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Network(err) => err.is_retryable(),
            ChatError::Stream(err) => err.is_retryable(),
            ChatError::Storage(_) => false,
            ChatError::Decode { .. } | ChatError::NotFound { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Network(err) => err.user_message(),
            ChatError::Stream(err) => err.user_message(),
            ChatError::Storage(err) => err.user_message(),
            ChatError::Decode { what, .. } => {
                format!("Received an unreadable {} from the server.", what)
            }
            ChatError::NotFound { what, id } if id.is_empty() => format!("No {} selected.", what),
            ChatError::NotFound { what, .. } => format!("That {} no longer exists.", what),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Network(err) => err.error_code(),
            ChatError::Stream(err) => err.error_code(),
            ChatError::Storage(err) => err.error_code(),
            ChatError::Decode { .. } => "E_DECODE",
            ChatError::NotFound { .. } => "E_NOT_FOUND",
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Network(err) => write!(f, "{}", err),
            ChatError::Stream(err) => write!(f, "{}", err),
            ChatError::Storage(err) => write!(f, "{}", err),
            ChatError::Decode { what, message } => {
                write!(f, "Failed to decode {}: {}", what, message)
            }
            ChatError::NotFound { what, id } if id.is_empty() => write!(f, "No {} selected", what),
            ChatError::NotFound { what, id } => write!(f, "Unknown {} '{}'", what, id),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Network(err) => Some(err),
            ChatError::Stream(err) => Some(err),
            ChatError::Storage(err) => Some(err),
            ChatError::Decode { .. } | ChatError::NotFound { .. } => None,
        }
    }
}

// ============================================================================
// From implementations for automatic error conversion
// ============================================================================

impl From<NetworkError> for ChatError {
    fn from(err: NetworkError) -> Self {
        ChatError::Network(err)
    }
}

impl From<StreamError> for ChatError {
    fn from(err: StreamError) -> Self {
        ChatError::Stream(err)
    }
}

impl From<StorageError> for ChatError {
    fn from(err: StorageError) -> Self {
        ChatError::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_unauthorized_is_auth_category() {
        let err: ChatError = NetworkError::HttpStatus {
            status: 401,
            message: "Not authenticated".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_server_status_is_server_category() {
        let err: ChatError = NetworkError::HttpStatus {
            status: 502,
            message: String::new(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Server);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_stream_error_conversion() {
        let err: ChatError = StreamError::NoBody.into();
        assert!(matches!(err, ChatError::Stream(StreamError::NoBody)));
        assert_eq!(err.category(), ErrorCategory::Server);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_storage_error_is_system() {
        let err: ChatError = StorageError::NoDataDirectory.into();
        assert_eq!(err.category(), ErrorCategory::System);
        assert_eq!(err.error_code(), "E_STORE_NODIR");
    }

    #[test]
    fn test_decode_display() {
        let err = ChatError::Decode {
            what: "conversation list".to_string(),
            message: "expected array".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to decode conversation list: expected array"
        );
        assert!(err.user_message().contains("conversation list"));
    }

    #[test]
    fn test_not_found_display() {
        let err = ChatError::NotFound {
            what: "conversation".to_string(),
            id: "12".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown conversation '12'");
        assert_eq!(err.category(), ErrorCategory::Client);

        let err = ChatError::NotFound {
            what: "domain".to_string(),
            id: String::new(),
        };
        assert_eq!(err.to_string(), "No domain selected");
    }
}
