//! Local persistence errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the durable key-value store behind the last-selection
/// pointer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No data directory could be determined.
    #[error("Could not determine a data directory for domchat")]
    NoDataDirectory,

    /// Reading or writing the store file failed.
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not valid JSON.
    #[error("Corrupt store file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Backend-specific failure (used by test doubles).
    #[error("Storage error: {0}")]
    Other(String),
}

impl StorageError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StorageError::NoDataDirectory => {
                "Could not find a home directory to remember your last conversation.".to_string()
            }
            StorageError::Io { path, .. } => {
                format!("Could not save your last conversation to {}.", path.display())
            }
            StorageError::Corrupt { path, .. } => {
                format!("The file {} is damaged and was ignored.", path.display())
            }
            StorageError::Other(message) => message.clone(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::NoDataDirectory => "E_STORE_NODIR",
            StorageError::Io { .. } => "E_STORE_IO",
            StorageError::Corrupt { .. } => "E_STORE_CORRUPT",
            StorageError::Other(_) => "E_STORE_OTHER",
        }
    }
}
