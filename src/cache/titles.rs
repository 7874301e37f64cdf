//! Title and preview resolution for ConversationCache

use crate::models::{Conversation, Message};
use crate::title::{derive_title, DEFAULT_TITLE, ELLIPSIS};

use super::{
    ConversationCache, LOAD_FAILED_PREVIEW, MAX_PREVIEW_CHARS, NO_MESSAGES_PREVIEW,
};

/// One-line preview of a history: its last message, truncated.
///
/// An empty history reads "No messages yet"; a blank last message gives an
/// empty preview.
pub fn preview_from_messages(messages: &[Message]) -> String {
    let Some(last) = messages.last() else {
        return NO_MESSAGES_PREVIEW.to_string();
    };

    let text = last.preview_text().trim();
    if text.chars().count() > MAX_PREVIEW_CHARS {
        let mut preview: String = text.chars().take(MAX_PREVIEW_CHARS).collect();
        preview.push(ELLIPSIS);
        preview
    } else {
        text.to_string()
    }
}

fn title_from_messages(messages: &[Message]) -> String {
    derive_title(messages.iter().find(|m| m.is_user()).map(Message::text))
}

fn is_meaningful_title(title: &str) -> bool {
    !title.trim().is_empty() && title != DEFAULT_TITLE
}

fn is_placeholder_preview(preview: &str) -> bool {
    preview.trim().is_empty() || preview == NO_MESSAGES_PREVIEW || preview == LOAD_FAILED_PREVIEW
}

impl ConversationCache {
    /// Resolve the title to display for a conversation.
    ///
    /// Order: a cached derived title, the conversation's own title, one
    /// derived from its first message, one derived from its last-message
    /// preview, then the default title. The default title never shadows a
    /// later source.
    pub fn get_title(&self, conversation: &Conversation) -> String {
        if let Some(cached) = self.titles.get(&conversation.id) {
            if is_meaningful_title(cached) {
                return cached.clone();
            }
        }

        if let Some(title) = conversation.title.as_deref() {
            if is_meaningful_title(title) {
                return title.to_string();
            }
        }

        if let Some(first) = conversation.first_message.as_deref() {
            return derive_title(Some(first));
        }

        let preview = conversation
            .last_message_preview
            .as_deref()
            .or_else(|| self.previews.get(&conversation.id).map(String::as_str));
        if let Some(preview) = preview.filter(|p| !is_placeholder_preview(p)) {
            return derive_title(Some(preview));
        }

        DEFAULT_TITLE.to_string()
    }

    /// Preview to display under a conversation's title.
    pub fn preview(&self, conversation: &Conversation) -> String {
        self.previews
            .get(&conversation.id)
            .cloned()
            .or_else(|| conversation.last_message_preview.clone())
            .unwrap_or_else(|| NO_MESSAGES_PREVIEW.to_string())
    }

    /// Cache a title, never letting the default title replace a real one.
    pub fn set_title(&mut self, conversation_id: &str, title: impl Into<String>) {
        let title = title.into();
        if !is_meaningful_title(&title) {
            if let Some(existing) = self.titles.get(conversation_id) {
                if is_meaningful_title(existing) {
                    return;
                }
            }
        }
        self.titles.insert(conversation_id.to_string(), title);
    }

    /// Record a freshly fetched history for the selected conversation.
    ///
    /// The preview always follows the history; a title is derived only when
    /// none is cached yet.
    pub fn record_selection(&mut self, conversation_id: &str, messages: &[Message]) {
        self.previews
            .insert(conversation_id.to_string(), preview_from_messages(messages));

        let has_title = self
            .titles
            .get(conversation_id)
            .is_some_and(|t| is_meaningful_title(t));
        if !has_title {
            self.set_title(conversation_id, title_from_messages(messages));
        }

        self.resolved.insert(conversation_id.to_string());
    }

    /// Apply a history fetched during backfill.
    pub(crate) fn apply_history(&mut self, conversation_id: &str, messages: &[Message]) {
        self.set_title(conversation_id, title_from_messages(messages));
        self.previews
            .insert(conversation_id.to_string(), preview_from_messages(messages));
        self.resolved.insert(conversation_id.to_string());
    }

    /// Mark a conversation whose history could not be fetched.
    pub(crate) fn apply_failure(&mut self, conversation_id: &str) {
        self.set_title(conversation_id, DEFAULT_TITLE);
        self.previews
            .insert(conversation_id.to_string(), LOAD_FAILED_PREVIEW.to_string());
    }
}
