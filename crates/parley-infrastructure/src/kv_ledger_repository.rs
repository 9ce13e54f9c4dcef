//! Key-value backed LedgerRepository implementation.
//!
//! The whole ledger is stored as one JSON array under a single key. Every
//! command is a read → apply → write transaction guarded by an async mutex,
//! so concurrent callers in this process never lose each other's updates.

use async_trait::async_trait;
use parley_core::conversation::{
    ConversationRecord, LedgerCommand, LedgerOutcome, LedgerRepository,
};
use parley_core::error::{ParleyError, Result};
use parley_core::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Ledger repository over any [`KeyValueStore`].
///
/// The write lock is taken in the caller's task, in call order; the
/// transaction itself then runs on its own task. If the caller stops waiting
/// (for example on a timeout) the transaction still completes and the next
/// one only starts after it.
#[derive(Clone)]
pub struct KvLedgerRepository {
    inner: Arc<LedgerInner>,
    write_lock: Arc<Mutex<()>>,
}

struct LedgerInner {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl KvLedgerRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(LedgerInner {
                store,
                key: key.into(),
            }),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

impl LedgerInner {
    async fn read_collection(&self) -> Result<Vec<ConversationRecord>> {
        match self.store.get(&self.key).await? {
            None => Ok(Vec::new()),
            Some(text) if text.trim().is_empty() => Ok(Vec::new()),
            Some(text) => Ok(serde_json::from_str(&text)?),
        }
    }

    async fn transact(&self, command: LedgerCommand) -> Result<LedgerOutcome> {
        let label = command.label();

        let mut records = match self.read_collection().await {
            Ok(records) => records,
            Err(e) if e.is_serialization() => {
                tracing::warn!(
                    "[KvLedgerRepository] '{}' is malformed, starting from an empty ledger: {}",
                    self.key,
                    e
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let outcome = command.apply(&mut records)?;

        if outcome.changed() {
            let json = serde_json::to_string(&records)?;
            self.store.set(&self.key, &json).await?;
        }

        tracing::debug!(
            "[KvLedgerRepository] {} -> {:?} ({} records)",
            label,
            outcome,
            records.len()
        );
        Ok(outcome)
    }
}

#[async_trait]
impl LedgerRepository for KvLedgerRepository {
    async fn list_all(&self) -> Result<Vec<ConversationRecord>> {
        self.inner.read_collection().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ConversationRecord>> {
        let records = self.inner.read_collection().await?;
        Ok(records.into_iter().find(|r| r.id == id))
    }

    async fn execute(&self, command: LedgerCommand) -> Result<LedgerOutcome> {
        let guard = Arc::clone(&self.write_lock).lock_owned().await;
        let inner = Arc::clone(&self.inner);
        let transaction = tokio::spawn(async move {
            let _guard = guard;
            inner.transact(command).await
        });
        transaction
            .await
            .map_err(|e| ParleyError::internal(format!("Ledger transaction aborted: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;
    use parley_core::conversation::Message;

    const KEY: &str = "saved_conversations";

    fn exchange(first: &str) -> Vec<Message> {
        vec![
            Message::system("greeting"),
            Message::user(first),
            Message::assistant("ok"),
        ]
    }

    fn repository() -> (KvLedgerRepository, Arc<InMemoryKeyValueStore>) {
        let store = Arc::new(InMemoryKeyValueStore::new());
        (KvLedgerRepository::new(store.clone(), KEY), store)
    }

    #[tokio::test]
    async fn test_empty_ledger() {
        let (repo, _) = repository();
        assert!(repo.list_all().await.unwrap().is_empty());
        assert!(repo.find_by_id("1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_persists_json_array() {
        let (repo, store) = repository();
        let outcome = repo
            .execute(LedgerCommand::Create {
                name: Some("Dự án A".to_string()),
                messages: exchange("hi"),
            })
            .await
            .unwrap();

        let raw = store.get(KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert_eq!(first["id"], outcome.id());
        assert_eq!(first["name"], "Dự án A");
        assert!(first["createdAt"].is_string());
        assert!(first["timestamp"].is_i64());
        assert_eq!(first["messages"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_validation_error_leaves_storage_untouched() {
        let (repo, store) = repository();
        let err = repo
            .execute(LedgerCommand::Create {
                name: Some(" ".to_string()),
                messages: exchange("hi"),
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.get(KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_delete_does_not_write() {
        let (repo, store) = repository();
        repo.execute(LedgerCommand::Delete {
            id: "ghost".to_string(),
        })
        .await
        .unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_malformed_collection_is_replaced_on_write() {
        let store = Arc::new(InMemoryKeyValueStore::with_entries([(KEY, "{oops")]));
        let repo = KvLedgerRepository::new(store.clone(), KEY);

        assert!(repo.list_all().await.unwrap_err().is_serialization());

        repo.execute(LedgerCommand::Reconcile {
            messages: exchange("hi"),
        })
        .await
        .unwrap();

        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_are_not_lost() {
        let (repo, _) = repository();
        let mut handles = Vec::new();
        for i in 0..25 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.execute(LedgerCommand::Reconcile {
                    messages: exchange(&format!("question {i}")),
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let records = repo.list_all().await.unwrap();
        assert_eq!(records.len(), 25);
        let mut ids: Vec<String> = records.into_iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 25);
    }
}
