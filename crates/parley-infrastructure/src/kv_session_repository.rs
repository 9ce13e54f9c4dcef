//! Key-value backed CurrentSessionRepository implementation.

use async_trait::async_trait;
use parley_core::conversation::{CurrentSessionRepository, Message};
use parley_core::error::{ParleyError, Result};
use parley_core::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Stores the live message list as one JSON array under a single key.
///
/// Writes are applied in call order and run to completion on their own task,
/// like [`crate::KvLedgerRepository`] transactions.
#[derive(Clone)]
pub struct KvCurrentSessionRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
    write_lock: Arc<Mutex<()>>,
}

impl KvCurrentSessionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait]
impl CurrentSessionRepository for KvCurrentSessionRepository {
    async fn load(&self) -> Result<Option<Vec<Message>>> {
        match self.store.get(&self.key).await? {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        }
    }

    async fn save(&self, messages: &[Message]) -> Result<()> {
        let json = serde_json::to_string(messages)?;
        let guard = Arc::clone(&self.write_lock).lock_owned().await;
        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        let write = tokio::spawn(async move {
            let _guard = guard;
            store.set(&key, &json).await
        });
        write
            .await
            .map_err(|e| ParleyError::internal(format!("Session write aborted: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;

    #[tokio::test]
    async fn test_save_overwrites_wholesale() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let repo = KvCurrentSessionRepository::new(store.clone(), "current_chat");

        assert!(repo.load().await.unwrap().is_none());

        repo.save(&[Message::system("greeting"), Message::user("a")])
            .await
            .unwrap();
        repo.save(&[Message::system("greeting")]).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, vec![Message::system("greeting")]);
    }

    #[tokio::test]
    async fn test_stored_shape() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let repo = KvCurrentSessionRepository::new(store.clone(), "current_chat");

        repo.save(&[Message::user("").with_image("file:///p.jpg")])
            .await
            .unwrap();

        let raw = store.get("current_chat").await.unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"role":"user","content":"","imageUri":"file:///p.jpg"}]"#
        );
    }

    #[tokio::test]
    async fn test_malformed_value_is_an_error() {
        let store = Arc::new(InMemoryKeyValueStore::with_entries([(
            "current_chat",
            r#"{"role": "user"}"#,
        )]));
        let repo = KvCurrentSessionRepository::new(store, "current_chat");
        assert!(repo.load().await.unwrap_err().is_serialization());
    }
}
