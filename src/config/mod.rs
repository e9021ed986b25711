//! Configuration management for the Raft log store.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support
//! - Environment variable overrides
mod engine;
pub use engine::*;


use std::env;
use std::path::PathBuf;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Prefix of environment variables read by [`StoreConfig::new`],
/// e.g. `RAFT_STORE__ENGINE__CACHE_CAPACITY`.
pub const ENV_PREFIX: &str = "RAFT_STORE";

/// Names a configuration file layered over the defaults.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Top-level store configuration
///
/// Sources, lowest priority first:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables with `RAFT_STORE__` prefix
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoreConfig {
    /// Directory the sled database lives in. Created on open if missing.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Embedded engine tuning
    #[serde(default)]
    pub engine: EngineOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            engine: EngineOptions::default(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Callers MUST call `validate()` before using the configuration.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("RAFT_STORE__DATA_DIR", "/var/lib/raft");
    /// let cfg = StoreConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        let config: Self = builder.add_source(env_source()).build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns validated instance.
    pub fn validate(self) -> Result<Self> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Message("data_dir must not be empty".to_string()).into());
        }
        self.engine.validate()?;
        Ok(self)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./db/raft")
}
