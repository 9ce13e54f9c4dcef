//! File-backed key-value store.
//!
//! Each key maps to one `<key>.json` file in the store directory:
//!
//! ```text
//! data_dir/
//! ├── current_chat.json
//! └── saved_conversations.json
//! ```

use super::atomic_file::AtomicFile;
use async_trait::async_trait;
use parley_core::error::{ParleyError, Result};
use parley_core::storage::KeyValueStore;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`, creating the directory if needed.
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        tracing::debug!("[FileKeyValueStore] Using directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        validate_key(key)?;
        Ok(AtomicFile::new(self.dir.join(format!("{}.json", key))))
    }
}

/// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ParleyError::InvalidKey(key.to_string()))
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ParleyError::internal(format!("Failed to join task: {}", e)))?
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.file_for(key)?;
        run_blocking(move || file.read()).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let file = self.file_for(key)?;
        let value = value.to_string();
        run_blocking(move || file.write(&value)).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let file = self.file_for(key)?;
        run_blocking(move || file.remove()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path()).await.unwrap();

        assert!(store.get("current_chat").await.unwrap().is_none());

        store.set("current_chat", "[]").await.unwrap();
        assert_eq!(store.get("current_chat").await.unwrap().as_deref(), Some("[]"));
        assert!(temp_dir.path().join("current_chat.json").exists());

        store.remove("current_chat").await.unwrap();
        assert!(store.get("current_chat").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FileKeyValueStore::new(temp_dir.path()).await.unwrap();
            store.set("saved_conversations", r#"[{"id":"1"}]"#).await.unwrap();
        }
        let reopened = FileKeyValueStore::new(temp_dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("saved_conversations").await.unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path()).await.unwrap();

        for key in ["", "../escape", "a/b", "with space", "dot.json"] {
            let err = store.set(key, "{}").await.unwrap_err();
            assert_eq!(err, ParleyError::InvalidKey(key.to_string()));
        }
    }

    #[tokio::test]
    async fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let store = FileKeyValueStore::new(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }
}
