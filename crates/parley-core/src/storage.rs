//! Key-value storage abstraction.
//!
//! The store persists named values only: one JSON document per key, replaced
//! in full on every write. Backends live in `parley-infrastructure`.

use crate::error::Result;
use async_trait::async_trait;

/// Durable string storage addressed by key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
