//! Configuration types and loading for the saga catalog.
//!
//! The main entry point is [`SagaConfig`], the contents of
//! `.saga/config.yaml`. Values are layered with `figment`: built-in
//! defaults, then the YAML file, then `SAGA_*` environment variables
//! (nested keys separated by `__`, e.g. `SAGA_RENDER__SEPARATOR`).

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Prefix of environment variables read as configuration.
const ENV_PREFIX: &str = "SAGA_";

/// `SAGA_*` variables that are not configuration keys.
const ENV_IGNORED: &[&str] = &["dir", "log"];

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file or directory could not be read or written.
    #[error("failed to access configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The layered configuration could not be extracted.
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    /// The configuration could not be written as YAML.
    #[error("failed to write configuration: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// The `.saga/` directory was not found.
    #[error("no .saga directory found (run 'saga init' first)")]
    DataDirNotFound,

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// Why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Tree rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Text placed between the alternatives of a dependency group.
    pub separator: String,

    /// Always render book citations, as with `-v`.
    pub citations: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            separator: " | ".to_string(),
            citations: false,
        }
    }
}

/// Collection tree settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Default depth for `tree list`; unlimited when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

/// The full saga configuration, corresponding to `.saga/config.yaml`.
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SagaConfig {
    /// Database file name, relative to the data directory.
    pub database: String,

    pub render: RenderConfig,

    pub tree: TreeConfig,
}

impl Default for SagaConfig {
    fn default() -> Self {
        Self {
            database: "saga.db".to_string(),
            render: RenderConfig::default(),
            tree: TreeConfig::default(),
        }
    }
}

impl SagaConfig {
    /// Path of the database file for the given data directory.
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database)
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "database".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// The layered configuration sources for a data directory.
pub fn figment(data_dir: &Path) -> Figment {
    Figment::from(Serialized::defaults(SagaConfig::default()))
        .merge(Yaml::file(data_dir.join(CONFIG_FILE_NAME)))
        .merge(Env::prefixed(ENV_PREFIX).split("__").ignore(ENV_IGNORED))
}

/// Loads the configuration for a data directory.
///
/// A missing or empty `config.yaml` yields the defaults, still overridden by
/// the environment.
pub fn load_config(data_dir: &Path) -> Result<SagaConfig> {
    let config: SagaConfig = figment(data_dir).extract()?;
    config.validate()?;
    Ok(config)
}

/// Saves configuration to `config.yaml` inside the data directory.
///
/// The directory is created if it does not exist.
pub fn save_config(data_dir: &Path, config: &SagaConfig) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(data_dir.join(CONFIG_FILE_NAME), yaml)?;
    Ok(())
}
