//! Configuration file support.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! key = "pub_xxx"
//! base_url = "https://newsdata.io/api/1"
//!
//! [http]
//! timeout_secs = 5
//! connect_timeout_secs = 10
//! user_agent = "newsdata-client/0.1.0"
//!
//! [logging]
//! level = "warn"
//! format = "text"
//! ```
//!
//! Every key is optional. [`ConfigFile`] is the on-disk shape; merging with
//! defaults and the environment happens in [`load_config`](super::load_config).

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::Config;

/// Configuration file structure
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub http: HttpSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// A file spelling out every default, with the key left blank
    pub fn create_default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ConfigFile {
    fn from(config: &Config) -> Self {
        Self {
            api: ApiSection {
                key: config.api.key.clone(),
                base_url: Some(config.api.base_url.clone()),
            },
            http: HttpSection {
                timeout_secs: Some(config.http.timeout_secs),
                connect_timeout_secs: Some(config.http.connect_timeout_secs),
                user_agent: Some(config.http.user_agent.clone()),
            },
            logging: LoggingSection {
                level: Some(config.logging.level.clone()),
                format: config.logging.format.clone(),
            },
        }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
