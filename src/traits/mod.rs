//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, DELETE, streaming)
//! - [`KeyValueStore`] - Durable key-value storage for small local state

pub mod http;
pub mod storage;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
pub use storage::KeyValueStore;
