//! Unified error handling for domchat.
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, timeout | Yes |
//! | Auth | Bearer token rejected | No |
//! | Server | Backend errors (5xx), broken streams | Yes |
//! | Client | Malformed payloads, 4xx | No |
//! | System | Local persistence | No |

mod category;
mod chat_error;
mod network;
mod result;
mod storage;
mod stream;

pub use category::ErrorCategory;
pub use chat_error::ChatError;
pub use network::{classify_http_error, NetworkError};
pub use result::ChatResult;
pub use storage::StorageError;
pub use stream::StreamError;
