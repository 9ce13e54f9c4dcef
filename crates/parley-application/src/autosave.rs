//! Background reconciliation of the live session into the ledger.
//!
//! Every time the live session is persisted, the reconciler finds the saved
//! conversation that started with the same first user message and refreshes
//! it, or records a new one. Calls are sequenced by ticket per conversation,
//! so a slow, earlier snapshot can never overwrite a later snapshot of the
//! same conversation. Snapshots of different conversations never block each
//! other.

use crate::deadline::with_deadline;
use parley_core::conversation::{
    Fingerprint, LedgerCommand, LedgerOutcome, LedgerRepository, Message, MessageRole,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Result of one reconciliation attempt. Never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoSaveOutcome {
    /// The session had nothing worth saving yet.
    Skipped,
    Created(String),
    Updated(String),
    /// A later snapshot of the same conversation was already applied.
    Superseded,
    /// Storage failed or timed out; details were logged.
    Failed,
}

impl AutoSaveOutcome {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Created(id) | Self::Updated(id) => Some(id),
            _ => None,
        }
    }
}

/// Whether `messages` holds a real exchange: more than one message, at least
/// one from the user and at least one reply.
pub fn should_autosave(messages: &[Message]) -> bool {
    messages.len() > 1
        && messages.iter().any(|m| m.role() == MessageRole::User)
        && messages.iter().any(|m| m.role() == MessageRole::Assistant)
}

pub struct AutoSaveReconciler {
    ledger: Arc<dyn LedgerRepository>,
    timeout: Option<Duration>,
    next_ticket: AtomicU64,
    /// Highest applied ticket per conversation fingerprint.
    last_applied: Mutex<HashMap<Fingerprint, u64>>,
}

impl AutoSaveReconciler {
    pub fn new(ledger: Arc<dyn LedgerRepository>) -> Self {
        Self {
            ledger,
            timeout: None,
            next_ticket: AtomicU64::new(1),
            last_applied: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Takes the next sequence number. Higher tickets win.
    pub fn issue_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst)
    }

    /// Reconciles `messages` as the newest snapshot.
    pub async fn reconcile(&self, messages: &[Message]) -> AutoSaveOutcome {
        let ticket = self.issue_ticket();
        self.reconcile_with_ticket(ticket, messages).await
    }

    /// Reconciles `messages` taken at `ticket`.
    ///
    /// Discarded with [`AutoSaveOutcome::Superseded`] when a higher ticket has
    /// already been applied to the same conversation.
    pub async fn reconcile_with_ticket(
        &self,
        ticket: u64,
        messages: &[Message],
    ) -> AutoSaveOutcome {
        if !should_autosave(messages) {
            return AutoSaveOutcome::Skipped;
        }
        let Some(fingerprint) = Fingerprint::of(messages) else {
            return AutoSaveOutcome::Skipped;
        };

        let mut last_applied = self.last_applied.lock().await;
        let applied = last_applied.entry(fingerprint).or_insert(0);
        if ticket < *applied {
            tracing::debug!(
                "[AutoSave] Ticket {} superseded by {}, dropping snapshot",
                ticket,
                *applied
            );
            return AutoSaveOutcome::Superseded;
        }
        *applied = ticket;

        let command = LedgerCommand::Reconcile {
            messages: messages.to_vec(),
        };
        match with_deadline(self.timeout, "reconcile", self.ledger.execute(command)).await {
            Ok(LedgerOutcome::Created(id)) => {
                tracing::debug!("[AutoSave] Recorded new conversation {}", id);
                AutoSaveOutcome::Created(id)
            }
            Ok(LedgerOutcome::Updated(id)) => {
                tracing::debug!("[AutoSave] Refreshed conversation {}", id);
                AutoSaveOutcome::Updated(id)
            }
            Ok(other) => {
                tracing::warn!("[AutoSave] Unexpected ledger outcome: {:?}", other);
                AutoSaveOutcome::Failed
            }
            Err(e) => {
                tracing::warn!("[AutoSave] Failed to reconcile session: {}", e);
                AutoSaveOutcome::Failed
            }
        }
    }
}
