//! Application configuration.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::models::PLACEHOLDER_IMAGE_URL;

/// Directory name under the platform config dir.
pub const APP_DIR: &str = "gamevault";
/// Prefix for environment overrides, e.g. `GAMEVAULT_SEED_SAMPLES=false`.
pub const ENV_PREFIX: &str = "GAMEVAULT";

/// Settings shared by the catalog core and its frontends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the persisted `games` and `favorites` entries.
    pub data_dir: PathBuf,
    /// Image URL stored for games saved without one.
    pub placeholder_image_url: String,
    /// Install the starter catalog when the collection is empty.
    pub seed_samples: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: config_root().join("data"),
            placeholder_image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            seed_samples: true,
        }
    }
}

impl AppConfig {
    /// Load from the default config file layered with environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (optional) layered with `GAMEVAULT_*` environment variables.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = Config::builder()
            .add_source(File::from(path.clone()).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

/// Root directory for configuration and data.
pub fn config_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Location of the main config file.
pub fn config_path() -> PathBuf {
    config_root().join("config.toml")
}

/// Write a default config file when none exists yet.
pub fn ensure_default_config() -> Result<()> {
    ensure_default_config_at(config_path()).map(|_| ())
}

/// Write a default config to `path` if missing. Returns whether a file was written.
pub fn ensure_default_config_at(path: impl Into<PathBuf>) -> Result<bool> {
    let path = path.into();
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let serialized =
        toml::to_string_pretty(&AppConfig::default()).context("failed to serialize config")?;
    fs::write(&path, serialized)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    Ok(true)
}
