//! Wiring of the store, reconciler, loader and session sync.

use crate::autosave::AutoSaveReconciler;
use crate::conversation_store::ConversationStore;
use crate::session_sync::SessionSync;
use crate::startup::StartupLoader;
use parley_core::ParleyConfig;
use parley_core::conversation::{CurrentSessionRepository, LedgerRepository};
use parley_core::storage::KeyValueStore;
use parley_infrastructure::{KvCurrentSessionRepository, KvLedgerRepository};
use std::sync::Arc;
use std::time::Duration;

/// The UI-facing services over one key-value store.
///
/// All parts share the same repositories, so their writes are serialized
/// against each other.
pub struct ParleyServices {
    pub store: ConversationStore,
    pub reconciler: Arc<AutoSaveReconciler>,
    pub startup: StartupLoader,
    pub session: SessionSync,
}

impl ParleyServices {
    /// Builds the services from `config` over `kv`.
    pub fn new(kv: Arc<dyn KeyValueStore>, config: &ParleyConfig) -> Self {
        let timeout = config.storage.operation_timeout_ms.map(Duration::from_millis);
        let greeting = config.session.greeting.clone();

        let ledger: Arc<dyn LedgerRepository> = Arc::new(KvLedgerRepository::new(
            Arc::clone(&kv),
            config.storage.saved_conversations_key.clone(),
        ));
        let current: Arc<dyn CurrentSessionRepository> = Arc::new(
            KvCurrentSessionRepository::new(kv, config.storage.current_chat_key.clone()),
        );

        let store = ConversationStore::new(Arc::clone(&ledger)).with_timeout(timeout);
        let reconciler = Arc::new(AutoSaveReconciler::new(ledger).with_timeout(timeout));
        let startup =
            StartupLoader::new(Arc::clone(&current), greeting.clone()).with_timeout(timeout);
        let session = SessionSync::new(current, store.clone(), Arc::clone(&reconciler), greeting)
            .with_timeout(timeout);

        tracing::debug!(
            "[ParleyServices] Ready (ledger '{}', session '{}', timeout {:?})",
            config.storage.saved_conversations_key,
            config.storage.current_chat_key,
            timeout
        );

        Self {
            store,
            reconciler,
            startup,
            session,
        }
    }
}
