//! Configuration management.
//!
//! Settings are layered, lowest precedence first: built-in defaults, an
//! optional TOML file, then `NEWSDATA_*` environment variables
//! (`NEWSDATA_API_KEY`, `NEWSDATA_API__BASE_URL`, `NEWSDATA_HTTP__TIMEOUT_SECS`, ...).

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BASE_URL;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "NEWSDATA_API_KEY";

/// Prefix of all environment overrides.
pub const ENV_PREFIX: &str = "NEWSDATA";

/// File name searched for in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "newsdata.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API credentials and endpoint root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Logging configuration (used by the binary only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` or `json`
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("api.key", std::env::var(API_KEY_ENV).ok())?
        .build()?;

    settings.try_deserialize()
}

/// Locate a configuration file: `./newsdata.toml`, then
/// `<config dir>/newsdata/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    default_config_path().filter(|path| path.is_file())
}

/// Per-user configuration path, whether or not it exists
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("newsdata").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.key, None);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert!(config.http.user_agent.starts_with("newsdata-client/"));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("newsdata.toml");
        std::fs::write(
            &path,
            r#"
[api]
key = "file-key"
base_url = "http://localhost:9999/api/1"

[http]
timeout_secs = 12
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        if std::env::var(API_KEY_ENV).is_err() {
            assert_eq!(config.api.key.as_deref(), Some("file-key"));
        }
        assert_eq!(config.api.base_url, "http://localhost:9999/api/1");
        assert_eq!(config.http.timeout_secs, 12);
        assert_eq!(config.http.connect_timeout_secs, 10);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/newsdata.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("newsdata/config.toml"));
        }
    }
}
