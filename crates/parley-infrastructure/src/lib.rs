pub mod config_service;
pub mod kv_ledger_repository;
pub mod kv_session_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::kv_ledger_repository::KvLedgerRepository;
pub use crate::kv_session_repository::KvCurrentSessionRepository;
pub use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore};
