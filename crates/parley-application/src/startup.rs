//! Restores the live session when the app starts.

use crate::deadline::with_deadline;
use parley_core::conversation::{CurrentSessionRepository, Message};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Loads the stored current session once per process.
///
/// A stored session with more than one message is resumed. Anything else,
/// including a read failure or a malformed value, starts a new session made
/// of the greeting alone.
pub struct StartupLoader {
    session: Arc<dyn CurrentSessionRepository>,
    greeting: String,
    timeout: Option<Duration>,
    loaded: OnceCell<Vec<Message>>,
}

impl StartupLoader {
    pub fn new(session: Arc<dyn CurrentSessionRepository>, greeting: impl Into<String>) -> Self {
        Self {
            session,
            greeting: greeting.into(),
            timeout: None,
            loaded: OnceCell::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The initial session. Storage is read on the first call only.
    pub async fn load(&self) -> Vec<Message> {
        self.loaded
            .get_or_init(|| self.read_initial_session())
            .await
            .clone()
    }

    async fn read_initial_session(&self) -> Vec<Message> {
        match with_deadline(self.timeout, "load_current_chat", self.session.load()).await {
            Ok(Some(messages)) if messages.len() > 1 => {
                tracing::info!("[Startup] Resuming session with {} messages", messages.len());
                messages
            }
            Ok(_) => {
                tracing::debug!("[Startup] No session to resume, starting fresh");
                vec![Message::system(self.greeting.clone())]
            }
            Err(e) => {
                tracing::warn!("[Startup] Could not restore session, starting fresh: {}", e);
                vec![Message::system(self.greeting.clone())]
            }
        }
    }
}
