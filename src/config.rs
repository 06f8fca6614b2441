//! Server configuration, read from a TOML file.
//!
//! ```toml
//! bind = "0.0.0.0:3000"
//! log_filter = "unperline=info,tower_http=info"
//! feed_limit = 50
//!
//! [storage]
//! backend = "sqlite"
//! path = "data/unperline.db"
//! ```
//!
//! Every field is optional. Command line flags override the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::service::{Settings, DEFAULT_FEED_LIMIT};

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_LOG_FILTER: &str = "unperline=info,tower_http=info";
pub const DEFAULT_DATABASE: &str = "unperline.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("feed_limit must be at least 1")]
    ZeroFeedLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bind: String,
    pub log_filter: String,
    pub feed_limit: usize,
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: DEFAULT_BIND.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            feed_limit: DEFAULT_FEED_LIMIT,
            storage: StorageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: Backend,
    /// Database file, used by the sqlite backend.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            backend: Backend::Memory,
            path: PathBuf::from(DEFAULT_DATABASE),
        }
    }
}

impl Config {
    pub fn from_toml(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &contents)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Config::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed_limit == 0 {
            return Err(ConfigError::ZeroFeedLimit);
        }
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        Settings {
            feed_limit: self.feed_limit,
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
