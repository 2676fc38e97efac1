//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! The first existing file wins:
//! 1. Path passed with `--config`
//! 2. `$CARDMINT_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/cardmint/config.toml`
//! 4. `~/.cardmint/config.toml`
//!
//! An explicit `--config` path that does not exist is an error. A
//! `$CARDMINT_CONFIG` path that does not exist produces a warning and the
//! search continues.
//!
//! # Example
//!
//! ```no_run
//! use cardmint::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! let config = result.config;
//!
//! println!("Attempts: {}", config.allocator_settings().max_attempts);
//! println!("Registry: {}", config.registry_provider());
//! ```

pub mod schema;

pub use schema::{AllocatorConfig, FileConfig, RegistrarConfig, RegistryConfig, WordBankConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::allocator::AllocatorSettings;
use super::registrar::RegistrarSettings;
use crate::registry::DEFAULT_PROVIDER;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "CARDMINT_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Candidate locations taken from the environment.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    pub env_config: Option<PathBuf>,
    pub xdg_config_home: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

impl SearchPaths {
    /// Read the search locations from the process environment.
    pub fn from_env() -> Self {
        Self {
            env_config: std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            home: dirs::home_dir(),
        }
    }

    /// Pick the config file to load, if any.
    fn resolve(&self, warnings: &mut Vec<ConfigWarning>) -> Option<PathBuf> {
        if let Some(path) = &self.env_config {
            if path.exists() {
                return Some(path.clone());
            }
            warnings.push(ConfigWarning {
                message: format!("${} points to a missing file; ignoring it", CONFIG_ENV),
                path: path.clone(),
            });
        }

        let xdg = self
            .xdg_config_home
            .as_ref()
            .map(|dir| dir.join("cardmint/config.toml"));
        let home = self.home.as_ref().map(|dir| dir.join(".cardmint/config.toml"));

        [xdg, home].into_iter().flatten().find(|path| path.exists())
    }
}

/// Effective configuration.
///
/// Accessors apply defaults for anything the file leaves unset.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: FileConfig,
    /// Path of the loaded config file, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `explicit` or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` does not exist, or if the chosen file
    /// cannot be read, parsed, or validated. Finding no file at all is not an
    /// error (defaults are used).
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_with(explicit, &SearchPaths::from_env())
    }

    /// Like [`Config::load`], with explicit search locations.
    pub fn load_with(
        explicit: Option<&Path>,
        search: &SearchPaths,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let path = match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => search.resolve(&mut warnings),
        };

        let config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Config::default(),
        };

        Ok(ConfigLoadResult { config, warnings })
    }

    /// Read, parse, and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Path of the loaded config file, if one was found.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn allocator_settings(&self) -> AllocatorSettings {
        let defaults = AllocatorSettings::default();
        let section = self.file.allocator.clone().unwrap_or_default();
        AllocatorSettings {
            max_attempts: section.max_attempts.unwrap_or(defaults.max_attempts),
            fallback_digits: section.fallback_digits.unwrap_or(defaults.fallback_digits),
        }
    }

    pub fn registrar_settings(&self) -> RegistrarSettings {
        let defaults = RegistrarSettings::default();
        let section = self.file.registrar.clone().unwrap_or_default();
        RegistrarSettings {
            max_insert_attempts: section
                .max_insert_attempts
                .unwrap_or(defaults.max_insert_attempts),
            timestamp_digits: section.timestamp_digits.unwrap_or(defaults.timestamp_digits),
            random_suffix_len: section
                .random_suffix_len
                .unwrap_or(defaults.random_suffix_len),
        }
    }

    /// Registry provider name (default: "file").
    pub fn registry_provider(&self) -> &str {
        self.file
            .registry
            .as_ref()
            .and_then(|r| r.provider.as_deref())
            .unwrap_or(DEFAULT_PROVIDER)
    }

    /// Registry file location, if configured.
    pub fn registry_path(&self) -> Option<&Path> {
        self.file.registry.as_ref().and_then(|r| r.path.as_deref())
    }

    /// Word bank override, if configured.
    pub fn word_bank_path(&self) -> Option<&Path> {
        self.file.word_bank.as_ref().and_then(|w| w.path.as_deref())
    }
}
