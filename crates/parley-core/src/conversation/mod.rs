//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: Message types (`MessageRole`, `Message`, `Product`)
//! - `record`: Saved conversation entity (`ConversationRecord`) and its `Fingerprint`
//! - `ledger`: Commands applied to the saved-conversations collection
//! - `sort`: Display orderings for saved conversations
//! - `repository`: Repository traits for the ledger and the current-session slot

mod ledger;
mod message;
mod record;
mod repository;
mod sort;

pub use ledger::{LedgerCommand, LedgerOutcome};
pub use message::{Message, MessageRole, Product, conversational_count, without_system};
pub use record::{ConversationRecord, Fingerprint, generate_id};
pub use repository::{CurrentSessionRepository, LedgerRepository};
pub use sort::ConversationSort;
