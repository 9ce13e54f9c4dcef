//! Unified path management for parley files.
//!
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use std::path::PathBuf;

const APP_DIR: &str = "parley";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    DirNotFound(&'static str),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DirNotFound(kind) => write!(f, "Cannot find {} directory", kind),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for parley.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/parley/            # Config directory
/// ├── config.toml              # Application configuration
/// └── logs/                    # Log files
///     └── parley.log.YYYY-MM-DD
///
/// ~/.local/share/parley/       # Data directory
/// ├── current_chat.json        # Current-session slot
/// └── saved_conversations.json # Saved-conversations ledger
/// ```
pub struct ParleyPaths;

impl ParleyPaths {
    /// Returns the parley configuration directory (e.g., `~/.config/parley/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("config"))
    }

    /// Returns the parley data directory (e.g., `~/.local/share/parley/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("data"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_under_config_dir() {
        let config_file = ParleyPaths::config_file().unwrap();
        assert!(config_file.ends_with("parley/config.toml"));
        assert!(config_file.starts_with(ParleyPaths::config_dir().unwrap()));
    }

    #[test]
    fn test_data_dir() {
        assert!(ParleyPaths::data_dir().unwrap().ends_with("parley"));
    }

    #[test]
    fn test_logs_dir() {
        let logs_dir = ParleyPaths::logs_dir().unwrap();
        assert!(logs_dir.ends_with("logs"));
        assert!(logs_dir.starts_with(ParleyPaths::config_dir().unwrap()));
    }
}
