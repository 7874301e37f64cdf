//! Events sent from the reply task back to the session controller.

use crate::error::StreamError;
use crate::models::{Message, MessageId};

/// Everything the background reply task reports.
///
/// Events are applied in the order they were sent, by
/// [`ConversationSessionController::handle_event`](super::ConversationSessionController::handle_event)
/// only.
#[derive(Debug)]
pub enum SessionEvent {
    /// A decoded fragment of the assistant's reply
    Chunk {
        conversation_id: String,
        placeholder_id: MessageId,
        text: String,
    },
    /// The reply body ended normally; the authoritative list is being fetched
    StreamCompleted {
        conversation_id: String,
        placeholder_id: MessageId,
    },
    /// The authoritative message list after a completed reply
    Reconciled {
        conversation_id: String,
        messages: Vec<Message>,
    },
    /// The reply, or the refetch after it, failed
    StreamFailed {
        conversation_id: String,
        placeholder_id: MessageId,
        error: StreamError,
    },
}

/// How a send attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was sent: blank input, no current conversation, or a send already in flight
    Rejected,
    /// The reply streamed and the conversation was refreshed
    Completed,
    /// The reply failed; the placeholder was removed
    Failed,
}
