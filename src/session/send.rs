//! Send flow for the session controller
//!
//! `submit` appends the optimistic messages and spawns the reply task; the
//! task reports back through [`SessionEvent`]s which `handle_event` applies.

use std::sync::Arc;

use crate::error::{ChatError, StreamError};
use crate::models::{LengthHint, Message, MessageId};
use crate::state::{InFlightSend, SendPhase};
use crate::traits::HttpClient;

use super::{ConversationSessionController, SendOutcome, SessionEvent};

impl<C: HttpClient + 'static> ConversationSessionController<C> {
    /// Start sending `input` to the current conversation.
    ///
    /// Returns false, changing nothing, when the input is blank, no
    /// conversation is current, or a send is already in flight.
    pub fn submit(&mut self, input: &str, hint: LengthHint) -> bool {
        let content = input.trim();
        if content.is_empty() {
            return false;
        }
        if self.state.is_loading() {
            tracing::debug!("Ignoring submit while a send is in flight");
            return false;
        }
        let Some(conversation_id) = self.state.current_conversation().map(|c| c.id.clone()) else {
            tracing::debug!("Ignoring submit without a current conversation");
            return false;
        };

        let user_message = Message::local_user(content);
        let placeholder = Message::placeholder_assistant();
        let placeholder_id = placeholder.id.clone();

        self.state.messages.push(user_message);
        self.state.messages.push(placeholder);
        self.state.begin_send(InFlightSend {
            conversation_id: conversation_id.clone(),
            placeholder_id: placeholder_id.clone(),
        });

        tracing::info!(
            conversation_id = %conversation_id,
            placeholder_id = %placeholder_id,
            length = %hint,
            "Sending message"
        );

        self.spawn_reply_task(conversation_id, placeholder_id, content.to_string(), hint);
        self.state.set_phase(SendPhase::Streaming);
        true
    }

    fn spawn_reply_task(
        &self,
        conversation_id: String,
        placeholder_id: MessageId,
        content: String,
        hint: LengthHint,
    ) {
        let api = Arc::clone(&self.api);
        let assembler = self.assembler.clone();
        let events_tx = self.events_tx.clone();

        tokio::spawn(async move {
            let chunk_tx = events_tx.clone();
            let result = assembler
                .stream(&conversation_id, &content, hint, |text| {
                    let _ = chunk_tx.send(SessionEvent::Chunk {
                        conversation_id: conversation_id.clone(),
                        placeholder_id: placeholder_id.clone(),
                        text: text.to_string(),
                    });
                })
                .await;

            if let Err(error) = result {
                let _ = events_tx.send(SessionEvent::StreamFailed {
                    conversation_id,
                    placeholder_id,
                    error,
                });
                return;
            }

            let _ = events_tx.send(SessionEvent::StreamCompleted {
                conversation_id: conversation_id.clone(),
                placeholder_id: placeholder_id.clone(),
            });

            let event = match api.fetch_messages(&conversation_id).await {
                Ok(messages) => SessionEvent::Reconciled {
                    conversation_id,
                    messages,
                },
                Err(e) => SessionEvent::StreamFailed {
                    conversation_id,
                    placeholder_id,
                    error: StreamError::ReconcileFailed {
                        message: e.to_string(),
                    },
                },
            };
            let _ = events_tx.send(event);
        });
    }

    /// Apply one event from the reply task.
    ///
    /// Returns the outcome when the event finished the send.
    pub fn handle_event(&mut self, event: SessionEvent) -> Option<SendOutcome> {
        match event {
            SessionEvent::Chunk {
                conversation_id,
                placeholder_id,
                text,
            } => {
                if !self.state.append_to_message(&placeholder_id, &text) {
                    tracing::trace!(
                        conversation_id = %conversation_id,
                        "Dropping chunk for a placeholder that is no longer visible"
                    );
                }
                None
            }
            SessionEvent::StreamCompleted {
                conversation_id, ..
            } => {
                tracing::debug!(conversation_id = %conversation_id, "Reply complete, reconciling");
                self.state.set_phase(SendPhase::Reconciling);
                None
            }
            SessionEvent::Reconciled {
                conversation_id,
                messages,
            } => {
                // A conversation deleted mid-send must not come back into the cache.
                if self.state.conversation(&conversation_id).is_some() {
                    self.cache.record_selection(&conversation_id, &messages);
                    self.sync_preview(&conversation_id);
                }
                if self.state.is_current(&conversation_id) {
                    self.state.messages = messages;
                }
                tracing::info!(conversation_id = %conversation_id, "Message exchange reconciled");
                self.state.finish_send();
                Some(SendOutcome::Completed)
            }
            SessionEvent::StreamFailed {
                conversation_id,
                placeholder_id,
                error,
            } => {
                self.state.set_phase(SendPhase::Failed);
                self.state.remove_message(&placeholder_id);
                let err = ChatError::Stream(error);
                tracing::warn!(conversation_id = %conversation_id, "Reply failed, placeholder removed");
                self.report("Failed to send message", &err);
                self.state.finish_send();
                Some(SendOutcome::Failed)
            }
        }
    }

    /// Wait for the next event from the reply task.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Submit and apply events until the send is finished.
    pub async fn send_message(&mut self, input: &str, hint: LengthHint) -> SendOutcome {
        self.send_message_with(input, hint, |_| {}).await
    }

    /// Like [`send_message`](Self::send_message), also passing each applied
    /// chunk of the reply to `on_chunk`.
    pub async fn send_message_with<F>(
        &mut self,
        input: &str,
        hint: LengthHint,
        mut on_chunk: F,
    ) -> SendOutcome
    where
        F: FnMut(&str),
    {
        if !self.submit(input, hint) {
            return SendOutcome::Rejected;
        }

        while let Some(event) = self.next_event().await {
            if let SessionEvent::Chunk { text, .. } = &event {
                on_chunk(text);
            }
            if let Some(outcome) = self.handle_event(event) {
                return outcome;
            }
        }

        // The controller holds a sender, so the queue never closes while it lives.
        SendOutcome::Failed
    }
}
