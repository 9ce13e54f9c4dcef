//! Saved-conversations facade for the UI layer.
//!
//! `ConversationStore` wraps a [`LedgerRepository`] and never returns an
//! error: storage failures become `false`, `None` or an empty list and are
//! logged. Callers check return values.

use crate::deadline::with_deadline;
use parley_core::conversation::{
    ConversationRecord, ConversationSort, LedgerCommand, LedgerOutcome, LedgerRepository,
    Message,
};
use parley_core::error::{ParleyError, Result};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct ConversationStore {
    ledger: Arc<dyn LedgerRepository>,
    timeout: Option<Duration>,
}

impl ConversationStore {
    pub fn new(ledger: Arc<dyn LedgerRepository>) -> Self {
        Self {
            ledger,
            timeout: None,
        }
    }

    /// Bounds every storage call by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// All saved conversations in storage order.
    ///
    /// An unreadable or malformed ledger is reported as empty.
    pub async fn list(&self) -> Vec<ConversationRecord> {
        match with_deadline(self.timeout, "list", self.ledger.list_all()).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("[ConversationStore] Failed to list conversations: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn list_sorted(&self, sort: ConversationSort) -> Vec<ConversationRecord> {
        let mut records = self.list().await;
        sort.apply(&mut records);
        records
    }

    /// Full record for `id`, if present and readable.
    pub async fn get(&self, id: &str) -> Option<ConversationRecord> {
        match with_deadline(self.timeout, "get", self.ledger.find_by_id(id)).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("[ConversationStore] Failed to read conversation {}: {}", id, e);
                None
            }
        }
    }

    /// Saves `messages` under `name` as a new conversation.
    ///
    /// Returns the new id, or `None` when the name is blank, when there is
    /// nothing but system messages, or when storage fails.
    pub async fn create(&self, name: &str, messages: &[Message]) -> Option<String> {
        let command = LedgerCommand::Create {
            name: Some(name.to_string()),
            messages: messages.to_vec(),
        };
        match self.execute(command).await {
            Ok(LedgerOutcome::Created(id)) => {
                tracing::info!(
                    "[ConversationStore] Saved conversation {} ('{}')",
                    id,
                    name.trim()
                );
                Some(id)
            }
            Ok(other) => {
                tracing::warn!("[ConversationStore] Unexpected create outcome: {:?}", other);
                None
            }
            Err(e) => {
                log_rejection("create", &e);
                None
            }
        }
    }

    /// Messages of conversation `id`, exactly as stored.
    pub async fn load(&self, id: &str) -> Option<Vec<Message>> {
        self.get(id).await.map(|record| record.messages)
    }

    /// Deletes conversation `id`.
    ///
    /// Deleting an id that does not exist succeeds.
    pub async fn delete(&self, id: &str) -> bool {
        let command = LedgerCommand::Delete { id: id.to_string() };
        match self.execute(command).await {
            Ok(LedgerOutcome::Deleted(_)) => {
                tracing::info!("[ConversationStore] Deleted conversation {}", id);
                true
            }
            Ok(_) => {
                tracing::debug!("[ConversationStore] Delete of unknown conversation {}", id);
                true
            }
            Err(e) => {
                log_rejection("delete", &e);
                false
            }
        }
    }

    /// Replaces the messages of conversation `id` and refreshes its timestamp.
    ///
    /// Returns `false` if the conversation does not exist.
    pub async fn update(&self, id: &str, messages: &[Message]) -> bool {
        let command = LedgerCommand::ReplaceMessages {
            id: id.to_string(),
            messages: messages.to_vec(),
        };
        match self.execute(command).await {
            Ok(LedgerOutcome::Updated(_)) => true,
            Ok(_) => false,
            Err(e) => {
                log_rejection("update", &e);
                false
            }
        }
    }

    /// Renames conversation `id`. Blank names are rejected.
    pub async fn rename(&self, id: &str, name: &str) -> bool {
        let command = LedgerCommand::Rename {
            id: id.to_string(),
            name: name.to_string(),
        };
        match self.execute(command).await {
            Ok(LedgerOutcome::Renamed(_)) => true,
            Ok(_) => false,
            Err(e) => {
                log_rejection("rename", &e);
                false
            }
        }
    }

    async fn execute(&self, command: LedgerCommand) -> Result<LedgerOutcome> {
        let label = command.label();
        with_deadline(self.timeout, label, self.ledger.execute(command)).await
    }
}

fn log_rejection(operation: &str, error: &ParleyError) {
    if error.is_validation() {
        tracing::debug!("[ConversationStore] {} rejected: {}", operation, error);
    } else {
        tracing::warn!("[ConversationStore] {} failed: {}", operation, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parley_core::conversation::MessageRole;
    use parley_infrastructure::{InMemoryKeyValueStore, KvLedgerRepository};

    fn store() -> ConversationStore {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        ConversationStore::new(Arc::new(KvLedgerRepository::new(kv, "saved_conversations")))
    }

    fn chat() -> Vec<Message> {
        vec![
            Message::system("greeting"),
            Message::user("hi"),
            Message::assistant("hello"),
        ]
    }

    // Ledger that fails every call, for the never-throw contract.
    struct BrokenLedger;

    #[async_trait]
    impl LedgerRepository for BrokenLedger {
        async fn list_all(&self) -> Result<Vec<ConversationRecord>> {
            Err(ParleyError::io("disk unavailable"))
        }

        async fn find_by_id(&self, _id: &str) -> Result<Option<ConversationRecord>> {
            Err(ParleyError::io("disk unavailable"))
        }

        async fn execute(&self, _command: LedgerCommand) -> Result<LedgerOutcome> {
            Err(ParleyError::io("disk unavailable"))
        }
    }

    // Ledger that never answers.
    struct StuckLedger;

    #[async_trait]
    impl LedgerRepository for StuckLedger {
        async fn list_all(&self) -> Result<Vec<ConversationRecord>> {
            std::future::pending().await
        }

        async fn find_by_id(&self, _id: &str) -> Result<Option<ConversationRecord>> {
            std::future::pending().await
        }

        async fn execute(&self, _command: LedgerCommand) -> Result<LedgerOutcome> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_create_and_load() {
        let store = store();
        let id = store.create("Dự án A", &chat()).await.unwrap();

        let messages = store.load(&id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role(), MessageRole::User);

        let records = store.list().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Dự án A"));
    }

    #[tokio::test]
    async fn test_update_and_rename() {
        let store = store();
        let id = store.create("first", &chat()).await.unwrap();

        let mut longer = chat();
        longer.push(Message::user("more"));
        assert!(store.update(&id, &longer).await);
        assert_eq!(store.load(&id).await.unwrap().len(), 3);

        assert!(store.rename(&id, "second").await);
        assert_eq!(store.get(&id).await.unwrap().name.as_deref(), Some("second"));

        assert!(!store.rename(&id, "  ").await);
        assert!(!store.rename("missing", "x").await);
        assert!(!store.update("missing", &longer).await);
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let store = store();
        store.create("b", &chat()).await.unwrap();
        store.create("a", &chat()).await.unwrap();

        let names: Vec<String> = store
            .list_sorted(ConversationSort::Name)
            .await
            .into_iter()
            .map(|r| r.title())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_storage_failures_do_not_escape() {
        let store = ConversationStore::new(Arc::new(BrokenLedger));

        assert!(store.list().await.is_empty());
        assert!(store.create("x", &chat()).await.is_none());
        assert!(store.load("1").await.is_none());
        assert!(!store.delete("1").await);
        assert!(!store.update("1", &chat()).await);
        assert!(!store.rename("1", "y").await);
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure() {
        let store = ConversationStore::new(Arc::new(StuckLedger))
            .with_timeout(Some(Duration::from_millis(20)));

        assert!(store.list().await.is_empty());
        assert!(store.create("x", &chat()).await.is_none());
        assert!(!store.delete("1").await);
    }
}
