//! Bounded-concurrency backfill of titles and previews

use futures::stream::{self, StreamExt};

use crate::api::ChatApi;
use crate::models::Conversation;
use crate::traits::HttpClient;

use super::ConversationCache;

impl ConversationCache {
    /// Fill in titles and previews for every conversation not yet resolved.
    ///
    /// At most `concurrency` histories are fetched at once. A failed fetch
    /// only affects its own conversation, which gets the default title and
    /// the load-failed preview and is retried by the next backfill.
    /// Resolved conversations are served from the cache, so repeated calls
    /// over an unchanged history are stable.
    ///
    /// Returns the conversations, in their original order, with
    /// `last_message_preview` set to the cached preview.
    pub async fn backfill<C: HttpClient>(
        &mut self,
        api: &ChatApi<C>,
        conversations: Vec<Conversation>,
        concurrency: usize,
    ) -> Vec<Conversation> {
        let pending: Vec<String> = conversations
            .iter()
            .filter(|c| !self.is_resolved(&c.id))
            .map(|c| c.id.clone())
            .collect();

        if !pending.is_empty() {
            tracing::debug!(
                pending = pending.len(),
                total = conversations.len(),
                concurrency,
                "Backfilling conversation titles"
            );
        }

        let results: Vec<_> = stream::iter(pending)
            .map(|id| async move {
                let result = api.fetch_messages(&id).await;
                (id, result)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let mut failed = 0usize;
        for (id, result) in results {
            match result {
                Ok(messages) => self.apply_history(&id, &messages),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        conversation_id = %id,
                        error_code = e.error_code(),
                        error = %e,
                        "Failed to load messages for backfill"
                    );
                    self.apply_failure(&id);
                }
            }
        }
        if failed > 0 {
            tracing::info!(failed, "Backfill finished with failures");
        }

        conversations
            .into_iter()
            .map(|mut conversation| {
                if let Some(preview) = self.previews.get(&conversation.id) {
                    conversation.last_message_preview = Some(preview.clone());
                }
                conversation
            })
            .collect()
    }
}
