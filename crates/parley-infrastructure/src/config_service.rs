//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml`
//! (`~/.config/parley/config.toml` unless a path is given).

use crate::paths::ParleyPaths;
use crate::storage::AtomicFile;
use parley_core::config::ParleyConfig;
use parley_core::error::{ParleyError, Result};
use std::path::{Path, PathBuf};

/// Configuration service bound to one config file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicFile,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path),
        }
    }

    /// Uses the platform config location.
    pub fn default_location() -> Result<Self> {
        let path = ParleyPaths::config_file()
            .map_err(|e| ParleyError::config(format!("Failed to get config path: {}", e)))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Loads the configuration.
    ///
    /// A missing or empty file yields [`ParleyConfig::default`]; a file that
    /// does not parse or validate is an error.
    pub fn load(&self) -> Result<ParleyConfig> {
        match self.file.read()? {
            Some(content) if !content.trim().is_empty() => {
                let config = ParleyConfig::from_toml_str(&content)?;
                tracing::debug!("[ConfigService] Loaded {}", self.path().display());
                Ok(config)
            }
            _ => {
                tracing::debug!(
                    "[ConfigService] No config at {}, using defaults",
                    self.path().display()
                );
                Ok(ParleyConfig::default())
            }
        }
    }

    /// Writes the default configuration if no file exists yet.
    ///
    /// Returns `true` when a file was created.
    pub fn write_default_if_missing(&self) -> Result<bool> {
        if self.file.read()?.is_some() {
            return Ok(false);
        }
        let content = ParleyConfig::default().to_toml_string()?;
        self.file.write(&content)?;
        Ok(true)
    }

    /// Directory the key-value store should use for `config`.
    pub fn resolve_data_dir(config: &ParleyConfig) -> Result<PathBuf> {
        match &config.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => ParleyPaths::data_dir()
                .map_err(|e| ParleyError::config(format!("Failed to get data directory: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));
        assert_eq!(service.load().unwrap(), ParleyConfig::default());
    }

    #[test]
    fn test_loads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[storage]\ndata_dir = \"/srv/parley\"\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = ConfigService::new(path).load().unwrap();
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/srv/parley")));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            ConfigService::resolve_data_dir(&config).unwrap(),
            PathBuf::from("/srv/parley")
        );
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[storage\n").unwrap();
        assert!(ConfigService::new(path).load().unwrap_err().is_serialization());
    }

    #[test]
    fn test_write_default_if_missing() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));

        assert!(service.write_default_if_missing().unwrap());
        assert!(!service.write_default_if_missing().unwrap());
        assert_eq!(service.load().unwrap(), ParleyConfig::default());
    }
}
