//! domchat - a client for domain-specialized AI chat
//!
//! The session controller drives domain and conversation selection, keeps
//! sidebar titles and previews fresh, and streams assistant replies into the
//! message list. This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod labels;
pub mod models;
pub mod selection;
pub mod session;
pub mod state;
pub mod stream;
pub mod title;
pub mod traits;
