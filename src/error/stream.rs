//! Streaming-related error types.
//!
//! Errors raised while reading the assistant's reply from the chunked
//! response body.

use std::fmt;

/// Stream-specific error variants.
#[derive(Debug, Clone)]
pub enum StreamError {
    /// The stream request could not be opened.
    OpenFailed { message: String },

    /// The response carried no readable body.
    NoBody,

    /// A read failed after the stream had started.
    ReadFailed { message: String },

    /// Refetching the authoritative message list after the stream ended failed.
    ReconcileFailed { message: String },
}

impl StreamError {
    /// Check if this error is likely transient and can be retried.
    ///
    /// Streams are never retried automatically; a retryable failure is
    /// flagged on the notification so the user can resend.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StreamError::ReadFailed { .. } | StreamError::ReconcileFailed { .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::OpenFailed { .. } => {
                "Failed to send message. The assistant could not be reached.".to_string()
            }
            StreamError::NoBody => {
                "Failed to send message. The server returned an empty response.".to_string()
            }
            StreamError::ReadFailed { .. } => {
                "The response was interrupted. Please try again.".to_string()
            }
            StreamError::ReconcileFailed { .. } => {
                "The response finished but the conversation could not be refreshed.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::OpenFailed { .. } => "E_STREAM_OPEN",
            StreamError::NoBody => "E_STREAM_NOBODY",
            StreamError::ReadFailed { .. } => "E_STREAM_READ",
            StreamError::ReconcileFailed { .. } => "E_STREAM_RECONCILE",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::OpenFailed { message } => write!(f, "Failed to open stream: {}", message),
            StreamError::NoBody => write!(f, "No response body"),
            StreamError::ReadFailed { message } => write!(f, "Stream read failed: {}", message),
            StreamError::ReconcileFailed { message } => {
                write!(f, "Failed to refresh messages after stream: {}", message)
            }
        }
    }
}

impl std::error::Error for StreamError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_body_display() {
        assert_eq!(StreamError::NoBody.to_string(), "No response body");
        assert!(!StreamError::NoBody.is_retryable());
    }

    #[test]
    fn test_read_failed_is_retryable() {
        let err = StreamError::ReadFailed {
            message: "reset".to_string(),
        };
        assert!(err.is_retryable());
        assert!(err.to_string().contains("reset"));
        assert_eq!(err.error_code(), "E_STREAM_READ");
    }
}
