//! Configuration model.
//!
//! Loaded from `config.toml` by `parley-infrastructure::config_service`.
//! Every field has a default, so an empty or missing file is a valid config.
//!
//! ```toml
//! [storage]
//! data_dir = "/var/lib/parley"
//! current_chat_key = "current_chat"
//! saved_conversations_key = "saved_conversations"
//! operation_timeout_ms = 5000
//!
//! [session]
//! greeting = "Hello! How can I help you today?"
//!
//! [logging]
//! level = "info"
//! file = false
//! ```

use crate::error::{ParleyError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CURRENT_CHAT_KEY: &str = "current_chat";
pub const DEFAULT_SAVED_CONVERSATIONS_KEY: &str = "saved_conversations";
pub const DEFAULT_GREETING: &str =
    "Hello! I'm your shopping assistant. Ask me anything or send a photo of a product.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    pub storage: StorageSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the stored values. `None` = platform data dir.
    pub data_dir: Option<PathBuf>,
    pub current_chat_key: String,
    pub saved_conversations_key: String,
    /// Deadline for a single storage operation. `None` disables it.
    pub operation_timeout_ms: Option<u64>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            current_chat_key: DEFAULT_CURRENT_CHAT_KEY.to_string(),
            saved_conversations_key: DEFAULT_SAVED_CONVERSATIONS_KEY.to_string(),
            operation_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Text of the system message a fresh session starts with.
    pub greeting: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Also write a daily rolling log file.
    pub file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: false,
        }
    }
}

impl ParleyConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let storage = &self.storage;
        if storage.current_chat_key.trim().is_empty()
            || storage.saved_conversations_key.trim().is_empty()
        {
            return Err(ParleyError::config("storage keys must not be empty"));
        }
        if storage.current_chat_key == storage.saved_conversations_key {
            return Err(ParleyError::config(
                "current_chat_key and saved_conversations_key must differ",
            ));
        }
        if storage.operation_timeout_ms == Some(0) {
            return Err(ParleyError::config("operation_timeout_ms must be positive"));
        }
        Ok(())
    }
}
