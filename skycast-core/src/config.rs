use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::error::FetchError;

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "SKYCAST_API_KEY";

/// Position used as the device-location source for frontends without a
/// geolocation radio (the CLI).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomePosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Geocoding API key.
    ///
    /// Example TOML:
    /// api_key = "..."
    pub api_key: Option<String>,

    /// Optional home position answering "use my location" requests.
    pub home: Option<HomePosition>,

    /// Keep the previously displayed snapshot when a unit-toggle re-fetch
    /// fails, instead of clearing it like any other error.
    #[serde(default)]
    pub keep_snapshot_on_unit_error: bool,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist
    /// yet. The [`API_KEY_ENV`] override is applied either way.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;

        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(key) = env::var(API_KEY_ENV)
            && !key.is_empty()
        {
            cfg.api_key = Some(key);
        }

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The credential, or the typed cause that classifies as a configuration
    /// error.
    pub fn require_api_key(&self) -> Result<&str, FetchError> {
        self.api_key.as_deref().ok_or(FetchError::MissingApiKey)
    }
}
