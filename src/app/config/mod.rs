use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub mod browse;
pub mod user;

pub use browse::BrowseConfig;
pub use user::{LoggingConfig, UserConfig};

const APP_NAME: &str = "carbrowse";

pub struct AppConfig;

impl AppConfig {
    pub fn get_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    pub fn get_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_NAME)
    }

    /// Load `config.toml`, falling back to defaults when it is missing or broken
    pub fn load() -> UserConfig {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> UserConfig {
        if !path.exists() {
            return UserConfig::default();
        }
        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config {}: {:#}", path.display(), e);
                UserConfig::default()
            }
        }
    }

    fn read(path: &Path) -> Result<UserConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).context("Invalid TOML")
    }

    /// Default config as TOML, for `--generate-config`
    pub fn default_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&UserConfig::default())?)
    }
}
