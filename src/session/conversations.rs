//! Domain and conversation operations for the session controller

use crate::error::{ChatError, ChatResult};
use crate::models::Domain;
use crate::state::Notification;
use crate::title::DEFAULT_TITLE;
use crate::traits::HttpClient;

use super::ConversationSessionController;

impl<C: HttpClient + 'static> ConversationSessionController<C> {
    /// Fetch the domain catalog.
    pub async fn load_domains(&mut self) -> ChatResult<()> {
        match self.api.list_domains().await {
            Ok(domains) => {
                tracing::info!(count = domains.len(), "Loaded domains");
                self.state.domains = domains;
                Ok(())
            }
            Err(e) => {
                self.report("Failed to load domains", &e);
                Err(e)
            }
        }
    }

    /// Switch to a domain and restore its last active conversation.
    ///
    /// The stored selection wins if it is still listed; otherwise the first
    /// conversation becomes current, or none when the domain is empty.
    pub async fn enter_domain(&mut self, domain: Domain) -> ChatResult<()> {
        let domain_id = domain.id.clone();
        tracing::info!(domain_id = %domain_id, name = %domain.name, "Entering domain");

        self.state.selected_domain = Some(domain);
        self.state.conversations.clear();
        self.state.set_current(None);

        self.load_conversations().await?;

        let stored = match self.selections.get(&domain_id).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(domain_id = %domain_id, error = %e, "Could not read last selection");
                None
            }
        };

        let restored = stored
            .filter(|id| self.state.conversation(id).is_some())
            .or_else(|| self.state.conversations.first().map(|c| c.id.clone()));

        match restored {
            Some(conversation_id) => self.select_conversation(&conversation_id).await,
            None => Ok(()),
        }
    }

    /// Re-list and backfill the selected domain, keeping the current conversation.
    pub async fn refresh_conversations(&mut self) -> ChatResult<()> {
        self.load_conversations().await
    }

    async fn load_conversations(&mut self) -> ChatResult<()> {
        let domain_id = self.require_domain()?;

        let listed = match self.api.list_conversations(Some(&domain_id)).await {
            Ok(listed) => listed,
            Err(e) => {
                self.report("Failed to load conversations", &e);
                return Err(e);
            }
        };

        let conversations = self
            .cache
            .backfill(&self.api, listed, self.backfill_concurrency)
            .await;
        tracing::debug!(domain_id = %domain_id, count = conversations.len(), "Listed conversations");
        self.state.conversations = conversations;
        Ok(())
    }

    /// Make a listed conversation current and load its messages.
    pub async fn select_conversation(&mut self, conversation_id: &str) -> ChatResult<()> {
        if self.state.conversation(conversation_id).is_none() {
            let err = ChatError::NotFound {
                what: "conversation".to_string(),
                id: conversation_id.to_string(),
            };
            self.report("Failed to open conversation", &err);
            return Err(err);
        }

        self.state.set_current(Some(conversation_id.to_string()));
        self.remember_selection(conversation_id).await;

        match self.api.fetch_messages(conversation_id).await {
            Ok(messages) => {
                self.cache.record_selection(conversation_id, &messages);
                self.sync_preview(conversation_id);
                if self.state.is_current(conversation_id) {
                    self.state.messages = messages;
                }
                Ok(())
            }
            Err(e) => {
                self.report("Failed to load messages", &e);
                Err(e)
            }
        }
    }

    /// Create a conversation in the selected domain and make it current.
    pub async fn create_conversation(&mut self) -> ChatResult<String> {
        let domain_id = self.require_domain()?;

        let conversation = match self.api.create_conversation(&domain_id, DEFAULT_TITLE).await {
            Ok(conversation) => conversation,
            Err(e) => {
                self.report("Failed to create conversation", &e);
                return Err(e);
            }
        };

        let conversation_id = conversation.id.clone();
        self.cache.set_title(&conversation_id, DEFAULT_TITLE);
        self.state.prepend_conversation(conversation);
        self.state.set_current(Some(conversation_id.clone()));
        self.remember_selection(&conversation_id).await;

        Ok(conversation_id)
    }

    /// Delete a conversation; if it was current, clear the current state and pointer.
    pub async fn delete_conversation(&mut self, conversation_id: &str) -> ChatResult<()> {
        if let Err(e) = self.api.delete_conversation(conversation_id).await {
            self.report("Failed to delete conversation", &e);
            return Err(e);
        }

        self.state.remove_conversation(conversation_id);
        self.cache.remove(conversation_id);

        if self.state.is_current(conversation_id) {
            self.state.set_current(None);
            if let Some(domain_id) = self.state.selected_domain_id().map(str::to_string) {
                if let Err(e) = self.selections.clear(&domain_id).await {
                    tracing::warn!(domain_id = %domain_id, error = %e, "Could not clear last selection");
                }
            }
        }

        self.notify(Notification::info("Success", "Conversation deleted"));
        Ok(())
    }

    fn require_domain(&mut self) -> ChatResult<String> {
        match self.state.selected_domain_id() {
            Some(id) => Ok(id.to_string()),
            None => {
                let err = ChatError::NotFound {
                    what: "domain".to_string(),
                    id: String::new(),
                };
                self.report("No domain selected", &err);
                Err(err)
            }
        }
    }

    async fn remember_selection(&mut self, conversation_id: &str) {
        let Some(domain_id) = self.state.selected_domain_id().map(str::to_string) else {
            return;
        };
        if let Err(e) = self.selections.set(&domain_id, conversation_id).await {
            tracing::warn!(
                domain_id = %domain_id,
                conversation_id,
                error_code = e.error_code(),
                error = %e,
                "Could not persist last selection"
            );
        }
    }

    /// Copy the cached preview onto the listed conversation.
    pub(crate) fn sync_preview(&mut self, conversation_id: &str) {
        let Some(preview) = self.cache.cached_preview(conversation_id).map(str::to_string) else {
            return;
        };
        if let Some(conversation) = self
            .state
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            conversation.last_message_preview = Some(preview);
        }
    }
}
