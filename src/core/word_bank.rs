//! core::word_bank
//!
//! Read-only word pools used to compose card titles and pick abilities.
//!
//! # Format
//!
//! A word bank is a TOML document:
//!
//! ```toml
//! version = 1
//! prefixes = ["Iron", "Storm"]
//! suffixes = ["Warden"]
//! characters = ["Golem", "Wyrm"]
//! abilities = ["Stone Gaze"]
//! ```
//!
//! The built-in bank lives in `data/word_bank.toml` and is compiled into the
//! binary. A different bank can be supplied through `[word_bank] path` in the
//! configuration.
//!
//! # Invariants
//!
//! - Every pool is non-empty
//! - Entries are non-empty, trimmed, free of control characters, and unique
//!   within their pool
//! - The longest composable title leaves room for a fallback timestamp
//!   suffix within [`MAX_TITLE_LEN`]
//! - A loaded bank is never mutated

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::clock::MAX_LAST_DIGITS;
use super::types::MAX_TITLE_LEN;

/// Layout version understood by this build.
pub const WORD_BANK_VERSION: u32 = 1;

/// Longest title a bank may compose: a space and the widest timestamp
/// suffix must still fit within [`MAX_TITLE_LEN`].
pub const MAX_COMPOSED_TITLE_LEN: usize = MAX_TITLE_LEN - 1 - MAX_LAST_DIGITS as usize;

const BUILTIN: &str = include_str!("../../data/word_bank.toml");

/// Errors from loading or validating a word bank.
#[derive(Debug, Error)]
pub enum WordBankError {
    #[error("failed to read word bank '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse word bank: {0}")]
    ParseError(String),

    #[error("unsupported word bank version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("word bank pool '{0}' is empty")]
    EmptyPool(&'static str),

    #[error("invalid entry in pool '{pool}': {entry:?}")]
    InvalidEntry { pool: &'static str, entry: String },

    #[error("duplicate entry in pool '{pool}': {entry:?}")]
    DuplicateEntry { pool: &'static str, entry: String },

    #[error("word bank composes titles of {length} characters (limit {limit})")]
    TitleTooLong { length: usize, limit: usize },
}

/// Word pools for title composition and ability selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WordBank {
    version: u32,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    characters: Vec<String>,
    abilities: Vec<String>,
}

impl WordBank {
    /// Load the word bank compiled into the binary.
    pub fn builtin() -> Result<Self, WordBankError> {
        Self::from_toml_str(BUILTIN)
    }

    /// Load a word bank from a TOML file.
    pub fn load(path: &Path) -> Result<Self, WordBankError> {
        let contents = fs::read_to_string(path).map_err(|e| WordBankError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a word bank from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, WordBankError> {
        let bank: WordBank =
            toml::from_str(contents).map_err(|e| WordBankError::ParseError(e.to_string()))?;
        bank.validate()?;
        Ok(bank)
    }

    /// Build a word bank from in-memory pools.
    ///
    /// Useful for tests that need a small, predictable fixture.
    pub fn from_pools<S: Into<String>>(
        prefixes: impl IntoIterator<Item = S>,
        suffixes: impl IntoIterator<Item = S>,
        characters: impl IntoIterator<Item = S>,
        abilities: impl IntoIterator<Item = S>,
    ) -> Result<Self, WordBankError> {
        let bank = WordBank {
            version: WORD_BANK_VERSION,
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            suffixes: suffixes.into_iter().map(Into::into).collect(),
            characters: characters.into_iter().map(Into::into).collect(),
            abilities: abilities.into_iter().map(Into::into).collect(),
        };
        bank.validate()?;
        Ok(bank)
    }

    fn validate(&self) -> Result<(), WordBankError> {
        if self.version != WORD_BANK_VERSION {
            return Err(WordBankError::UnsupportedVersion {
                found: self.version,
                expected: WORD_BANK_VERSION,
            });
        }
        validate_pool("prefixes", &self.prefixes)?;
        validate_pool("suffixes", &self.suffixes)?;
        validate_pool("characters", &self.characters)?;
        validate_pool("abilities", &self.abilities)?;

        let length = self.longest_title_len();
        if length > MAX_COMPOSED_TITLE_LEN {
            return Err(WordBankError::TitleTooLong {
                length,
                limit: MAX_COMPOSED_TITLE_LEN,
            });
        }
        Ok(())
    }

    /// Length in characters of the longest three-word title. Every other
    /// pattern is shorter.
    fn longest_title_len(&self) -> usize {
        let longest = |pool: &[String]| {
            pool.iter()
                .map(|entry| entry.chars().count())
                .max()
                .unwrap_or(0)
        };
        longest(&self.prefixes) + longest(&self.suffixes) + longest(&self.characters) + 2
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn characters(&self) -> &[String] {
        &self.characters
    }

    pub fn abilities(&self) -> &[String] {
        &self.abilities
    }

    /// Number of distinct strings the three title patterns can produce,
    /// assuming no accidental overlap between patterns.
    pub fn title_space(&self) -> u64 {
        let p = self.prefixes.len() as u64;
        let s = self.suffixes.len() as u64;
        let c = self.characters.len() as u64;
        p * c + c * s + p * s * c
    }

    /// SHA-256 over the bank contents, hex-encoded.
    ///
    /// Two banks with the same pools in the same order share a fingerprint
    /// regardless of TOML formatting.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_le_bytes());
        for (name, pool) in [
            ("prefixes", &self.prefixes),
            ("suffixes", &self.suffixes),
            ("characters", &self.characters),
            ("abilities", &self.abilities),
        ] {
            hasher.update(name.as_bytes());
            hasher.update((pool.len() as u64).to_le_bytes());
            for entry in pool {
                hasher.update((entry.len() as u64).to_le_bytes());
                hasher.update(entry.as_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }
}

fn validate_pool(pool: &'static str, entries: &[String]) -> Result<(), WordBankError> {
    if entries.is_empty() {
        return Err(WordBankError::EmptyPool(pool));
    }
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if entry.is_empty() || entry.trim() != entry || entry.chars().any(char::is_control) {
            return Err(WordBankError::InvalidEntry {
                pool,
                entry: entry.clone(),
            });
        }
        if !seen.insert(entry.as_str()) {
            return Err(WordBankError::DuplicateEntry {
                pool,
                entry: entry.clone(),
            });
        }
    }
    Ok(())
}
