//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which holds the authentication service base URL and the token storage
//! backend.
//!
//! Configuration is stored at `~/.config/reletter/config.json`. The base URL
//! can be overridden with the `RELETTER_API_URL` environment variable.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application name used for config/data/cache directory paths
const APP_NAME: &str = "reletter";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable carrying the service base URL
pub const API_URL_ENV: &str = "RELETTER_API_URL";

/// Where the access token is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    /// JSON file in the data directory
    #[default]
    File,
    /// OS keychain
    Keychain,
    /// Process memory only
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api_url: Option<String>,
    pub token_storage: TokenStorage,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            debug!(path = %path.display(), "Config loaded");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Base URL of the authentication service.
    ///
    /// The environment wins over the config file. Blank values count as unset.
    pub fn resolve_api_url(&self) -> Result<String> {
        let from_env = std::env::var(API_URL_ENV).ok();
        Self::pick_api_url(from_env.as_deref(), self.api_url.as_deref()).ok_or_else(|| {
            anyhow::anyhow!(
                "No API base URL configured. Set {} or \"api_url\" in {}",
                API_URL_ENV,
                Self::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| CONFIG_FILE.to_string())
            )
        })
    }

    fn pick_api_url(from_env: Option<&str>, from_file: Option<&str>) -> Option<String> {
        [from_env, from_file]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .map(str::to_string)
    }

    /// Directory for persisted application data (token storage)
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Directory for log files
    pub fn log_dir(&self) -> Result<PathBuf> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
