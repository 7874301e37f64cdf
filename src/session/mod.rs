//! Conversation session controller.
//!
//! The controller owns the session state, the title/preview cache and the
//! last-selection pointer, and is the only thing that mutates them. Domain
//! and conversation operations live in `conversations`; the send flow and
//! its event handling live in `send`.

mod conversations;
mod events;
mod send;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::adapters::{FileKeyValueStore, ReqwestHttpClient};
use crate::api::ChatApi;
use crate::cache::{ConversationCache, DEFAULT_BACKFILL_CONCURRENCY};
use crate::config::ClientConfig;
use crate::error::{classify_http_error, ChatError, ChatResult, StorageError};
use crate::models::Conversation;
use crate::selection::LastSelectionStore;
use crate::state::{Notification, SessionState};
use crate::stream::StreamingAssembler;
use crate::traits::HttpClient;

pub use events::{SendOutcome, SessionEvent};

/// Orchestrates selection, creation, deletion and the send flow.
///
/// All state changes happen on the task that owns the controller. The
/// background reply task only reports [`SessionEvent`]s through the
/// controller's queue.
pub struct ConversationSessionController<C: HttpClient + 'static> {
    api: Arc<ChatApi<C>>,
    assembler: StreamingAssembler<C>,
    cache: ConversationCache,
    selections: LastSelectionStore,
    state: SessionState,
    notifications: Vec<Notification>,
    backfill_concurrency: usize,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<C: HttpClient + 'static> ConversationSessionController<C> {
    pub fn new(api: Arc<ChatApi<C>>, selections: LastSelectionStore) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            assembler: StreamingAssembler::new(Arc::clone(&api)),
            api,
            cache: ConversationCache::new(),
            selections,
            state: SessionState::new(),
            notifications: Vec::new(),
            backfill_concurrency: DEFAULT_BACKFILL_CONCURRENCY,
            events_tx,
            events_rx,
        }
    }

    /// Set how many message histories backfill fetches at once (min 1).
    pub fn with_backfill_concurrency(mut self, concurrency: usize) -> Self {
        self.backfill_concurrency = concurrency.max(1);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn cache(&self) -> &ConversationCache {
        &self.cache
    }

    pub fn api(&self) -> &ChatApi<C> {
        &self.api
    }

    /// Title to display for a conversation; never empty.
    pub fn title_for(&self, conversation: &Conversation) -> String {
        self.cache.get_title(conversation)
    }

    /// One-line preview to display for a conversation.
    pub fn preview_for(&self, conversation: &Conversation) -> String {
        self.cache.preview(conversation)
    }

    /// Pending notifications, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Drain pending notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub(crate) fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Log a failed flow and surface it to the user once.
    pub(crate) fn report(&mut self, title: &str, err: &ChatError) {
        tracing::warn!(
            error_code = err.error_code(),
            category = %err.category(),
            retryable = err.is_retryable(),
            error = %err,
            "{}",
            title
        );
        self.notify(Notification::from_error(title, err));
    }
}

impl ConversationSessionController<ReqwestHttpClient> {
    /// Wire a controller to the real backend and the on-disk store.
    pub fn from_config(config: &ClientConfig) -> ChatResult<Self> {
        let client = ReqwestHttpClient::with_connect_timeout(config.connect_timeout)
            .map_err(|e| classify_http_error(e, &config.base_url))?;
        let api = ChatApi::new(client, config.base_url.clone()).with_token(config.token.clone());

        let data_dir = config
            .resolved_data_dir()
            .ok_or(StorageError::NoDataDirectory)?;
        let store = FileKeyValueStore::in_dir(&data_dir);
        tracing::debug!(path = %store.path().display(), "Using selection store");

        Ok(Self::new(Arc::new(api), LastSelectionStore::new(Arc::new(store)))
            .with_backfill_concurrency(config.backfill_concurrency))
    }
}

impl<C: HttpClient + 'static> std::fmt::Debug for ConversationSessionController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationSessionController")
            .field("base_url", &self.api.base_url())
            .field("state", &self.state)
            .field("cache", &self.cache)
            .field("notifications", &self.notifications.len())
            .finish_non_exhaustive()
    }
}
