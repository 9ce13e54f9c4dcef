//! Config loading and service construction for one CLI run.

use anyhow::{Context, Result};
use parley_application::ParleyServices;
use parley_core::ParleyConfig;
use parley_core::storage::KeyValueStore;
use parley_infrastructure::{ConfigService, FileKeyValueStore, InMemoryKeyValueStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn config_service(path: Option<&Path>) -> Result<ConfigService> {
    match path {
        Some(path) => Ok(ConfigService::new(path.to_path_buf())),
        None => ConfigService::default_location().context("Failed to locate config file"),
    }
}

/// Loads the config file; `--data-dir` overrides `storage.data_dir`.
pub fn load_config(service: &ConfigService, data_dir: Option<PathBuf>) -> Result<ParleyConfig> {
    let mut config = service
        .load()
        .with_context(|| format!("Failed to load config from {}", service.path().display()))?;
    if data_dir.is_some() {
        config.storage.data_dir = data_dir;
    }
    Ok(config)
}

pub async fn build_services(config: &ParleyConfig, ephemeral: bool) -> Result<ParleyServices> {
    let kv: Arc<dyn KeyValueStore> = if ephemeral {
        tracing::debug!("Using in-memory storage");
        Arc::new(InMemoryKeyValueStore::new())
    } else {
        let dir = ConfigService::resolve_data_dir(config)?;
        let store = FileKeyValueStore::new(&dir)
            .await
            .with_context(|| format!("Failed to open data directory {}", dir.display()))?;
        Arc::new(store)
    };
    Ok(ParleyServices::new(kv, config))
}
