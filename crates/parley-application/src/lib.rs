//! Application layer for Parley.
//!
//! UI-facing services over the conversation repositories. Nothing in this
//! crate returns a storage error to its caller: failures are logged and
//! reported as `false`, `None`, an empty list or an outcome value.

mod deadline;

pub mod autosave;
pub mod conversation_store;
pub mod services;
pub mod session_sync;
pub mod startup;

pub use autosave::{AutoSaveOutcome, AutoSaveReconciler, should_autosave};
pub use conversation_store::ConversationStore;
pub use services::ParleyServices;
pub use session_sync::{PersistOutcome, SessionSync};
pub use startup::StartupLoader;
