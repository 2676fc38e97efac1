//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! [allocator]
//! max_attempts = 100
//! fallback_digits = 4
//!
//! [registrar]
//! max_insert_attempts = 10
//! timestamp_digits = 4
//! random_suffix_len = 3
//!
//! [registry]
//! provider = "file"
//! path = "/var/lib/cardmint/titles.json"
//!
//! [word_bank]
//! path = "/etc/cardmint/word_bank.toml"
//! ```
//!
//! # Validation
//!
//! Every field is optional. Values are validated after parsing; budgets
//! must be at least one and digit counts must fit in an `i64` timestamp.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::clock::MAX_LAST_DIGITS;
use crate::registry::valid_provider_names;

/// Upper bound for `allocator.max_attempts`.
pub const MAX_ALLOCATOR_ATTEMPTS: u32 = 10_000;
/// Upper bound for `registrar.max_insert_attempts`.
pub const MAX_INSERT_ATTEMPTS: u32 = 1_000;
/// Upper bound for timestamp digit counts.
pub const MAX_TIMESTAMP_DIGITS: u32 = MAX_LAST_DIGITS;
/// Upper bound for `registrar.random_suffix_len`.
pub const MAX_RANDOM_SUFFIX_LEN: usize = 16;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub allocator: Option<AllocatorConfig>,
    pub registrar: Option<RegistrarConfig>,
    pub registry: Option<RegistryConfig>,
    pub word_bank: Option<WordBankConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(allocator) = &self.allocator {
            allocator.validate()?;
        }
        if let Some(registrar) = &self.registrar {
            registrar.validate()?;
        }
        if let Some(registry) = &self.registry {
            registry.validate()?;
        }
        if let Some(word_bank) = &self.word_bank {
            word_bank.validate()?;
        }
        Ok(())
    }
}

/// Title allocation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AllocatorConfig {
    /// Candidates checked before falling back
    pub max_attempts: Option<u32>,

    /// Timestamp digits appended to a fallback title
    pub fallback_digits: Option<u32>,
}

impl AllocatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(n) = self.max_attempts {
            check_range("allocator.max_attempts", n, 1, MAX_ALLOCATOR_ATTEMPTS)?;
        }
        if let Some(n) = self.fallback_digits {
            check_range("allocator.fallback_digits", n, 1, MAX_TIMESTAMP_DIGITS)?;
        }
        Ok(())
    }
}

/// Title registration settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrarConfig {
    /// Total insert attempts for a new owner
    pub max_insert_attempts: Option<u32>,

    /// Timestamp digits in a disambiguated title
    pub timestamp_digits: Option<u32>,

    /// Random characters in a disambiguated title
    pub random_suffix_len: Option<usize>,
}

impl RegistrarConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(n) = self.max_insert_attempts {
            check_range("registrar.max_insert_attempts", n, 1, MAX_INSERT_ATTEMPTS)?;
        }
        if let Some(n) = self.timestamp_digits {
            check_range("registrar.timestamp_digits", n, 1, MAX_TIMESTAMP_DIGITS)?;
        }
        if let Some(n) = self.random_suffix_len {
            check_range("registrar.random_suffix_len", n, 1, MAX_RANDOM_SUFFIX_LEN)?;
        }
        Ok(())
    }
}

/// Registry storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Provider name: "file" (default) or "memory"
    pub provider: Option<String>,

    /// Registry file location for the file provider
    pub path: Option<PathBuf>,
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(provider) = &self.provider {
            let valid = valid_provider_names();
            if !valid.contains(&provider.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid registry provider '{}', must be one of: {}",
                    provider,
                    valid.join(", ")
                )));
            }
        }
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "registry.path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Word bank source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WordBankConfig {
    /// TOML word bank to use instead of the built-in one
    pub path: Option<PathBuf>,
}

impl WordBankConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "word_bank.path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn check_range<T>(key: &str, value: T, min: T, max: T) -> Result<(), ConfigError>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ConfigError::InvalidValue(format!(
            "{} must be between {} and {}, got {}",
            key, min, max, value
        )));
    }
    Ok(())
}
