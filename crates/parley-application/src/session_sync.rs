//! Live-session persistence for the UI layer.

use crate::autosave::{AutoSaveOutcome, AutoSaveReconciler};
use crate::conversation_store::ConversationStore;
use crate::deadline::with_deadline;
use parley_core::conversation::{CurrentSessionRepository, Message};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// What happened to one [`SessionSync::persist`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    /// The current-session slot now holds this snapshot. `false` when the
    /// write failed or a newer snapshot already replaced it.
    pub slot_saved: bool,
    pub autosave: AutoSaveOutcome,
}

/// Keeps the current-session slot and the ledger in step with the UI.
///
/// Each persisted snapshot gets one ticket from the reconciler. The same
/// ticket guards the slot write: a stale snapshot never replaces a newer
/// slot, and the reconciler drops it only if a newer snapshot of the same
/// conversation was already saved.
pub struct SessionSync {
    session: Arc<dyn CurrentSessionRepository>,
    store: ConversationStore,
    reconciler: Arc<AutoSaveReconciler>,
    greeting: String,
    timeout: Option<Duration>,
    slot_ticket: Mutex<u64>,
}

impl SessionSync {
    pub fn new(
        session: Arc<dyn CurrentSessionRepository>,
        store: ConversationStore,
        reconciler: Arc<AutoSaveReconciler>,
        greeting: impl Into<String>,
    ) -> Self {
        Self {
            session,
            store,
            reconciler,
            greeting: greeting.into(),
            timeout: None,
            slot_ticket: Mutex::new(0),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overwrites the slot with `messages`, then reconciles them into the
    /// ledger when there is more than one message.
    pub async fn persist(&self, messages: &[Message]) -> PersistOutcome {
        let ticket = self.reconciler.issue_ticket();
        self.persist_at(ticket, messages).await
    }

    async fn persist_at(&self, ticket: u64, messages: &[Message]) -> PersistOutcome {
        let slot_saved = self.write_slot(ticket, messages).await.unwrap_or(false);

        let autosave = if messages.len() > 1 {
            self.reconciler.reconcile_with_ticket(ticket, messages).await
        } else {
            AutoSaveOutcome::Skipped
        };

        PersistOutcome {
            slot_saved,
            autosave,
        }
    }

    /// Replaces the slot with a fresh greeting and returns the new session.
    pub async fn start_new_chat(&self) -> Vec<Message> {
        let messages = vec![Message::system(self.greeting.clone())];
        let ticket = self.reconciler.issue_ticket();
        self.write_slot(ticket, &messages).await;
        tracing::info!("[SessionSync] Started a new chat");
        messages
    }

    /// Makes saved conversation `id` the live session.
    ///
    /// The ledger is not touched: opening a conversation is not a new
    /// exchange.
    pub async fn open_conversation(&self, id: &str) -> Option<Vec<Message>> {
        let messages = self.store.load(id).await?;
        let ticket = self.reconciler.issue_ticket();
        self.write_slot(ticket, &messages).await;
        tracing::info!("[SessionSync] Opened conversation {}", id);
        Some(messages)
    }

    /// The stored live session, if it can be read.
    pub async fn current(&self) -> Option<Vec<Message>> {
        match with_deadline(self.timeout, "load_current_chat", self.session.load()).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("[SessionSync] Failed to read current session: {}", e);
                None
            }
        }
    }

    /// Writes the slot unless a newer ticket already did.
    ///
    /// Returns `None` for a stale ticket, else whether the write succeeded.
    async fn write_slot(&self, ticket: u64, messages: &[Message]) -> Option<bool> {
        let mut last = self.slot_ticket.lock().await;
        if ticket < *last {
            tracing::debug!("[SessionSync] Ticket {} superseded by {}", ticket, *last);
            return None;
        }
        *last = ticket;

        match with_deadline(self.timeout, "save_current_chat", self.session.save(messages)).await
        {
            Ok(()) => Some(true),
            Err(e) => {
                tracing::warn!("[SessionSync] Failed to save current session: {}", e);
                Some(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_infrastructure::{
        InMemoryKeyValueStore, KvCurrentSessionRepository, KvLedgerRepository,
    };

    fn sync() -> (SessionSync, ConversationStore) {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let ledger = Arc::new(KvLedgerRepository::new(kv.clone(), "saved_conversations"));
        let session = Arc::new(KvCurrentSessionRepository::new(kv, "current_chat"));
        let store = ConversationStore::new(ledger.clone());
        let reconciler = Arc::new(AutoSaveReconciler::new(ledger));
        (
            SessionSync::new(session, store.clone(), reconciler, "Welcome"),
            store,
        )
    }

    #[tokio::test]
    async fn test_greeting_only_is_not_autosaved() {
        let (sync, store) = sync();
        let outcome = sync.persist(&[Message::system("Welcome")]).await;

        assert!(outcome.slot_saved);
        assert_eq!(outcome.autosave, AutoSaveOutcome::Skipped);
        assert!(store.list().await.is_empty());
        assert_eq!(sync.current().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_exchange_is_autosaved() {
        let (sync, store) = sync();
        let outcome = sync
            .persist(&[
                Message::system("Welcome"),
                Message::user("hi"),
                Message::assistant("hello"),
            ])
            .await;

        assert!(outcome.slot_saved);
        let id = outcome.autosave.id().unwrap().to_string();
        assert_eq!(store.load(&id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_stale_slot_write_still_saves_its_conversation() {
        let (sync, store) = sync();
        let stale = sync.reconciler.issue_ticket();

        let newer = vec![Message::user("B"), Message::assistant("b")];
        assert!(sync.persist(&newer).await.slot_saved);

        let older = vec![Message::user("A"), Message::assistant("a")];
        let outcome = sync.persist_at(stale, &older).await;
        assert!(!outcome.slot_saved);
        assert!(matches!(outcome.autosave, AutoSaveOutcome::Created(_)));

        assert_eq!(sync.current().await.unwrap(), newer);
        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_open_and_new_chat() {
        let (sync, store) = sync();
        let id = store
            .create("saved", &[Message::user("a"), Message::assistant("b")])
            .await
            .unwrap();

        let opened = sync.open_conversation(&id).await.unwrap();
        assert_eq!(sync.current().await.unwrap(), opened);
        assert_eq!(store.list().await.len(), 1);

        assert!(sync.open_conversation("missing").await.is_none());

        let fresh = sync.start_new_chat().await;
        assert_eq!(fresh, vec![Message::system("Welcome")]);
        assert_eq!(sync.current().await.unwrap(), fresh);
    }
}
