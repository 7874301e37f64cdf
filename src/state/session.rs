//! Session-level state
//!
//! SessionState is an explicit store owned by the session controller. It is
//! mutated only through the controller's operations, so tests can drive it
//! without any rendering environment.

use crate::models::{Conversation, Domain, Message, MessageId};

/// Progress of the send flow.
///
/// `Idle -> Sending -> Streaming -> Reconciling -> Idle`, or
/// `Streaming | Reconciling -> Failed -> Idle` on error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendPhase {
    #[default]
    Idle,
    Sending,
    Streaming,
    Reconciling,
    Failed,
}

impl SendPhase {
    /// Whether a send is in flight. Failed is terminal and does not block.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SendPhase::Sending | SendPhase::Streaming | SendPhase::Reconciling
        )
    }
}

/// The send currently in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlightSend {
    pub conversation_id: String,
    pub placeholder_id: MessageId,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Domain catalog
    pub domains: Vec<Domain>,
    pub selected_domain: Option<Domain>,
    /// Conversations of the selected domain, newest creations first
    pub conversations: Vec<Conversation>,
    /// Id of the current conversation; at most one at a time
    pub current_conversation_id: Option<String>,
    /// Visible messages of the current conversation
    pub messages: Vec<Message>,
    phase: SendPhase,
    in_flight: Option<InFlightSend>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SendPhase {
        self.phase
    }

    /// True while a send is in flight; new submits are rejected.
    pub fn is_loading(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn in_flight(&self) -> Option<&InFlightSend> {
        self.in_flight.as_ref()
    }

    pub(crate) fn set_phase(&mut self, phase: SendPhase) {
        if self.phase != phase {
            tracing::debug!(from = ?self.phase, to = ?phase, "Send phase changed");
            self.phase = phase;
        }
    }

    pub(crate) fn begin_send(&mut self, send: InFlightSend) {
        self.in_flight = Some(send);
        self.set_phase(SendPhase::Sending);
    }

    pub(crate) fn finish_send(&mut self) {
        self.in_flight = None;
        self.set_phase(SendPhase::Idle);
    }

    pub fn selected_domain_id(&self) -> Option<&str> {
        self.selected_domain.as_ref().map(|d| d.id.as_str())
    }

    pub fn current_conversation(&self) -> Option<&Conversation> {
        let id = self.current_conversation_id.as_deref()?;
        self.conversation(id)
    }

    pub fn is_current(&self, conversation_id: &str) -> bool {
        self.current_conversation_id.as_deref() == Some(conversation_id)
    }

    pub fn conversation(&self, conversation_id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == conversation_id)
    }

    /// Insert a conversation at the top of the list.
    pub(crate) fn prepend_conversation(&mut self, conversation: Conversation) {
        self.conversations.retain(|c| c.id != conversation.id);
        self.conversations.insert(0, conversation);
    }

    pub(crate) fn remove_conversation(&mut self, conversation_id: &str) -> bool {
        let before = self.conversations.len();
        self.conversations.retain(|c| c.id != conversation_id);
        self.conversations.len() != before
    }

    /// Make a conversation current and clear the visible messages.
    pub(crate) fn set_current(&mut self, conversation_id: Option<String>) {
        self.current_conversation_id = conversation_id;
        self.messages.clear();
    }

    /// Append streamed text to the message with `id`.
    ///
    /// Returns false when no such message is visible any more.
    pub(crate) fn append_to_message(&mut self, id: &MessageId, chunk: &str) -> bool {
        match self.messages.iter_mut().find(|m| &m.id == id) {
            Some(message) => {
                message.append_text(chunk);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_message(&mut self, id: &MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| &m.id != id);
        self.messages.len() != before
    }

    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = SessionState::new();
        assert_eq!(state.phase(), SendPhase::Idle);
        assert!(!state.is_loading());
        assert!(state.current_conversation().is_none());
    }

    #[test]
    fn test_failed_phase_does_not_block() {
        assert!(SendPhase::Streaming.is_busy());
        assert!(!SendPhase::Failed.is_busy());
    }

    #[test]
    fn test_prepend_keeps_single_entry() {
        let mut state = SessionState::new();
        state.conversations = vec![Conversation::new("1", "d"), Conversation::new("2", "d")];
        state.prepend_conversation(Conversation::new("3", "d"));
        state.prepend_conversation(Conversation::new("2", "d"));
        let ids: Vec<_> = state.conversations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_append_and_remove_by_id() {
        let mut state = SessionState::new();
        let user = Message::local_user("Hi");
        let placeholder = Message::placeholder_assistant();
        let placeholder_id = placeholder.id.clone();
        state.messages = vec![user, placeholder];

        assert!(state.append_to_message(&placeholder_id, "Hel"));
        assert!(state.append_to_message(&placeholder_id, "lo"));
        assert_eq!(state.message(&placeholder_id).unwrap().text(), "Hello");

        assert!(state.remove_message(&placeholder_id));
        assert!(!state.append_to_message(&placeholder_id, "!"));
        assert_eq!(state.messages.len(), 1);
    }
}
