//! Mock implementations for testing.
//!
//! These doubles let the cache, the streaming assembler and the session
//! controller be exercised without network or file system access.

pub mod http;
pub mod storage;

pub use http::{MockHttpClient, MockResponse};
pub use storage::InMemoryKeyValueStore;
