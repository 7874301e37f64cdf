//! Client configuration.
//!
//! Settings come from the environment with sensible defaults and can be
//! overridden with the builder methods.

use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::file_store::DATA_DIR;
use crate::api::DEFAULT_BASE_URL;
use crate::cache::DEFAULT_BACKFILL_CONCURRENCY;

/// Environment variable holding the backend base URL.
pub const ENV_API_URL: &str = "DOMCHAT_API_URL";
/// Environment variable holding the bearer token.
pub const ENV_TOKEN: &str = "DOMCHAT_TOKEN";
/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "DOMCHAT_DATA_DIR";
/// Environment variable overriding the backfill fan-out.
pub const ENV_BACKFILL_CONCURRENCY: &str = "DOMCHAT_BACKFILL_CONCURRENCY";

/// Configuration for connecting a session to the backend.
///
/// # Example
///
/// ```ignore
/// use domchat::config::ClientConfig;
///
/// let config = ClientConfig::from_env()
///     .with_base_url("http://chat.internal:8000")
///     .with_backfill_concurrency(3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL (default: http://localhost:8000)
    pub base_url: String,
    /// Bearer token; requests are unauthenticated without one
    pub token: Option<String>,
    /// Directory for persisted state; `None` means `~/.domchat`
    pub data_dir: Option<PathBuf>,
    /// Message histories fetched at once during backfill (default: 5, min: 1)
    pub backfill_concurrency: usize,
    /// Bound on establishing a connection (default: 10s)
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            data_dir: None,
            backfill_concurrency: DEFAULT_BACKFILL_CONCURRENCY,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the bearer token. Blank tokens are treated as absent.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Set the directory for persisted state.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set the backfill fan-out, clamped to at least 1.
    pub fn with_backfill_concurrency(mut self, concurrency: usize) -> Self {
        self.backfill_concurrency = concurrency.max(1);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Build a config from `DOMCHAT_*` environment variables.
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = non_empty_var(ENV_API_URL) {
            config = config.with_base_url(url);
        }
        config = config.with_token(non_empty_var(ENV_TOKEN));
        if let Some(dir) = non_empty_var(ENV_DATA_DIR) {
            config = config.with_data_dir(dir);
        }
        if let Some(raw) = non_empty_var(ENV_BACKFILL_CONCURRENCY) {
            match raw.parse::<usize>() {
                Ok(n) => config = config.with_backfill_concurrency(n),
                Err(_) => tracing::warn!(
                    value = %raw,
                    "Ignoring invalid {}",
                    ENV_BACKFILL_CONCURRENCY
                ),
            }
        }

        config
    }

    /// Resolved data directory.
    ///
    /// Returns `None` if no directory was configured and the home directory
    /// cannot be determined.
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(DATA_DIR)))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
