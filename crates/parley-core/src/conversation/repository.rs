//! Repository traits for conversation persistence.
//!
//! Defines the interface for the two durable values the store owns: the
//! saved-conversations ledger and the current-session slot.

use super::ledger::{LedgerCommand, LedgerOutcome};
use super::message::Message;
use super::record::ConversationRecord;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for the saved-conversations ledger.
///
/// The ledger is persisted as one collection value. Implementations must run
/// each [`LedgerCommand`] as a single load → apply → save transaction and must
/// not interleave two transactions on the same collection.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Lists all stored records in storage order.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<ConversationRecord>)`: All stored records (empty if none saved)
    /// - `Err(_)`: The collection could not be read or parsed
    async fn list_all(&self) -> Result<Vec<ConversationRecord>>;

    /// Finds a record by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))`: Record found
    /// - `Ok(None)`: No record with this ID
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, id: &str) -> Result<Option<ConversationRecord>>;

    /// Applies a command to the collection and persists the result.
    ///
    /// The write is skipped when the outcome reports no change
    /// (see [`LedgerOutcome::changed`]). A command rejected by validation
    /// returns `Err` and leaves storage untouched.
    async fn execute(&self, command: LedgerCommand) -> Result<LedgerOutcome>;
}

/// Repository for the current-session slot.
///
/// The slot holds exactly one message list and is replaced wholesale.
#[async_trait]
pub trait CurrentSessionRepository: Send + Sync {
    /// Loads the stored session.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(messages))`: A session was stored
    /// - `Ok(None)`: Nothing stored yet
    /// - `Err(_)`: Stored value unreadable or malformed
    async fn load(&self) -> Result<Option<Vec<Message>>>;

    /// Replaces the stored session with `messages`.
    async fn save(&self, messages: &[Message]) -> Result<()>;
}
