use super::browse::BrowseConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logging section of `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter, `RUST_LOG` wins when set
    #[serde(default = "default_level")]
    pub level: String,
    /// Where log files go (defaults to the user cache dir)
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
        }
    }
}

/// User-editable configuration (ReadOnly after load)
/// stored in `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub browse: BrowseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
