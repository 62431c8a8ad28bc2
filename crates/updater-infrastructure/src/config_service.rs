//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml` and applies environment
//! overrides on top.

use crate::paths::UpdaterPaths;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use updater_core::config::RootConfig;
use updater_core::error::{Result, UpdaterError};

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "PROJECT_UPDATER_API_BASE_URL";

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Creates a service reading from the default location.
    pub fn new() -> Result<Self> {
        let path = UpdaterPaths::config_file().map_err(|e| UpdaterError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates a service reading from an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration, falling back to defaults when the file does
    /// not exist, then applies process environment overrides.
    pub fn load(&self) -> Result<RootConfig> {
        let config = self.load_file()?;
        Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
    }

    fn load_file(&self) -> Result<RootConfig> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(RootConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: RootConfig = toml::from_str(&content)?;
        info!(path = %self.path.display(), "Loaded configuration");
        Ok(config)
    }
}

/// Applies overrides looked up through `env`.
pub fn apply_env_overrides(
    mut config: RootConfig,
    env: impl Fn(&str) -> Option<String>,
) -> RootConfig {
    if let Some(base_url) = env(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
        debug!(%base_url, "API base URL overridden from environment");
        config.api.base_url = base_url;
    }
    config
}
