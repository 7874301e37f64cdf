//! Conversation title and preview cache
//!
//! Derives display titles and one-line previews from message histories and
//! remembers them per conversation, with bounded-concurrency backfill.

mod backfill;
mod titles;

use std::collections::{HashMap, HashSet};

pub use titles::preview_from_messages;

/// Preview for a conversation without messages.
pub const NO_MESSAGES_PREVIEW: &str = "No messages yet";

/// Preview for a conversation whose history could not be fetched.
pub const LOAD_FAILED_PREVIEW: &str = "Failed to load messages";

/// Previews longer than this many characters are truncated.
pub const MAX_PREVIEW_CHARS: usize = 100;

/// Default number of message histories fetched at once during backfill.
pub const DEFAULT_BACKFILL_CONCURRENCY: usize = 5;

/// Derived titles and previews, keyed by conversation id.
#[derive(Debug, Default)]
pub struct ConversationCache {
    /// Derived titles; the default title counts as absent
    pub(crate) titles: HashMap<String, String>,
    /// Last-message previews
    pub(crate) previews: HashMap<String, String>,
    /// Conversations whose history has been fetched successfully
    pub(crate) resolved: HashSet<String>,
}

impl ConversationCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this conversation's history has already been read.
    pub fn is_resolved(&self, conversation_id: &str) -> bool {
        self.resolved.contains(conversation_id)
    }

    /// Cached title, if any, including the default title.
    pub fn cached_title(&self, conversation_id: &str) -> Option<&str> {
        self.titles.get(conversation_id).map(String::as_str)
    }

    /// Cached preview, if any.
    pub fn cached_preview(&self, conversation_id: &str) -> Option<&str> {
        self.previews.get(conversation_id).map(String::as_str)
    }

    /// Drop everything cached for a conversation.
    ///
    /// Must be called when the conversation is deleted.
    pub fn remove(&mut self, conversation_id: &str) -> bool {
        let had_title = self.titles.remove(conversation_id).is_some();
        let had_preview = self.previews.remove(conversation_id).is_some();
        let was_resolved = self.resolved.remove(conversation_id);
        had_title || had_preview || was_resolved
    }

    /// Clear all cached data
    pub fn clear(&mut self) {
        self.titles.clear();
        self.previews.clear();
        self.resolved.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty() && self.previews.is_empty() && self.resolved.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cache_is_empty() {
        let cache = ConversationCache::new();
        assert!(cache.is_empty());
        assert!(!cache.is_resolved("1"));
    }

    #[test]
    fn test_remove_evicts_everything() {
        let mut cache = ConversationCache::new();
        cache.titles.insert("1".to_string(), "Budget".to_string());
        cache.previews.insert("1".to_string(), "ok".to_string());
        cache.resolved.insert("1".to_string());

        assert!(cache.remove("1"));
        assert!(cache.cached_title("1").is_none());
        assert!(cache.cached_preview("1").is_none());
        assert!(!cache.is_resolved("1"));
        assert!(!cache.remove("1"));
    }

    #[test]
    fn test_clear() {
        let mut cache = ConversationCache::new();
        cache.titles.insert("1".to_string(), "Budget".to_string());
        cache.resolved.insert("2".to_string());
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
