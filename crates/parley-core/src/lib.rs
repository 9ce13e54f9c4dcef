//! Domain layer for Parley.
//!
//! Holds the conversation model, the ledger command set, repository and
//! storage traits, configuration types and the shared error type. Nothing in
//! this crate touches the file system.

pub mod config;
pub mod conversation;
pub mod error;
pub mod storage;

pub use config::ParleyConfig;
pub use error::{ParleyError, Result};
