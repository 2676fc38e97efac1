//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`OwnerId`] - Identifier of the record that owns a title
//! - [`Title`] - A card display name as stored in the registry
//! - [`Element`] - The closed set of six card elements
//!
//! # Validation
//!
//! Identifiers and titles are validated at construction time. Invalid values
//! cannot reach the registry.
//!
//! # Examples
//!
//! ```
//! use cardmint::core::types::{OwnerId, Title};
//!
//! let owner = OwnerId::new("card-0001").unwrap();
//! let title = Title::new("Crimson Phoenix").unwrap();
//!
//! assert!(OwnerId::new("").is_err());
//! assert!(Title::new("  padded  ").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of an owner id, in bytes.
pub const MAX_OWNER_ID_LEN: usize = 128;

/// Maximum length of a title, in characters.
pub const MAX_TITLE_LEN: usize = 120;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid owner id: {0}")]
    InvalidOwnerId(String),

    #[error("invalid title: {0}")]
    InvalidTitle(String),

    #[error("unknown element: {0}")]
    UnknownElement(String),
}

/// Shared checks for registry keys.
///
/// Keys must be non-empty, carry no leading or trailing whitespace and
/// contain no control characters.
fn check_key(value: &str, what: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{what} cannot be empty"));
    }
    if value.trim() != value {
        return Err(format!("{what} cannot have leading or trailing whitespace"));
    }
    if value.chars().any(char::is_control) {
        return Err(format!("{what} cannot contain control characters"));
    }
    Ok(())
}

/// Identifier of the owning record a title is bound to.
///
/// The registry treats owner ids as opaque; any non-empty, trimmed string
/// without control characters is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Create a validated owner id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOwnerId` if the value is empty, padded,
    /// too long, or contains control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        check_key(&id, "owner id").map_err(TypeError::InvalidOwnerId)?;
        if id.len() > MAX_OWNER_ID_LEN {
            return Err(TypeError::InvalidOwnerId(format!(
                "owner id exceeds {MAX_OWNER_ID_LEN} bytes"
            )));
        }
        Ok(Self(id))
    }

    /// Get the owner id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OwnerId> for String {
    fn from(id: OwnerId) -> Self {
        id.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A card display name.
///
/// Titles are compared exactly (case-sensitive) for uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Create a validated title.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTitle` if the value is empty, padded,
    /// too long, or contains control characters.
    pub fn new(title: impl Into<String>) -> Result<Self, TypeError> {
        let title = title.into();
        check_key(&title, "title").map_err(TypeError::InvalidTitle)?;
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(TypeError::InvalidTitle(format!(
                "title exceeds {MAX_TITLE_LEN} characters"
            )));
        }
        Ok(Self(title))
    }

    /// Get the title as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Title {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Card element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Shadow,
}

impl Element {
    /// Every element, in declaration order.
    pub const ALL: [Element; 6] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Light,
        Element::Shadow,
    ];

    /// Lowercase name, as used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Earth => "earth",
            Element::Air => "air",
            Element::Light => "light",
            Element::Shadow => "shadow",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Element {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnknownElement(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod owner_id {
        use super::*;

        #[test]
        fn accepts_plain_ids() {
            assert!(OwnerId::new("card-1").is_ok());
            assert!(OwnerId::new("550e8400-e29b-41d4-a716-446655440000").is_ok());
            assert!(OwnerId::new("has inner space").is_ok());
        }

        #[test]
        fn rejects_empty() {
            assert!(matches!(
                OwnerId::new(""),
                Err(TypeError::InvalidOwnerId(_))
            ));
        }

        #[test]
        fn rejects_padding() {
            assert!(OwnerId::new(" card").is_err());
            assert!(OwnerId::new("card\n").is_err());
        }

        #[test]
        fn rejects_overlong() {
            let long = "x".repeat(MAX_OWNER_ID_LEN + 1);
            assert!(OwnerId::new(long).is_err());
            assert!(OwnerId::new("x".repeat(MAX_OWNER_ID_LEN)).is_ok());
        }

        #[test]
        fn serde_roundtrip() {
            let id = OwnerId::new("card-7").unwrap();
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, "\"card-7\"");
            let parsed: OwnerId = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, id);
        }

        #[test]
        fn serde_rejects_invalid() {
            let result: Result<OwnerId, _> = serde_json::from_str("\"\"");
            assert!(result.is_err());
        }
    }

    mod title {
        use super::*;

        #[test]
        fn accepts_multi_word() {
            let t = Title::new("Ancient Warden Golem").unwrap();
            assert_eq!(t.as_str(), "Ancient Warden Golem");
            assert_eq!(t.to_string(), "Ancient Warden Golem");
        }

        #[test]
        fn rejects_control_chars() {
            assert!(matches!(
                Title::new("Bad\tTitle"),
                Err(TypeError::InvalidTitle(_))
            ));
        }

        #[test]
        fn length_counts_characters() {
            let at_limit = "é".repeat(MAX_TITLE_LEN);
            assert!(Title::new(at_limit).is_ok());
            assert!(Title::new("é".repeat(MAX_TITLE_LEN + 1)).is_err());
        }
    }

    mod element {
        use super::*;

        #[test]
        fn all_is_distinct() {
            let set: std::collections::HashSet<_> = Element::ALL.iter().collect();
            assert_eq!(set.len(), 6);
        }

        #[test]
        fn parse_is_case_insensitive() {
            assert_eq!("Fire".parse::<Element>().unwrap(), Element::Fire);
            assert_eq!("SHADOW".parse::<Element>().unwrap(), Element::Shadow);
            assert!("plasma".parse::<Element>().is_err());
        }

        #[test]
        fn serializes_lowercase() {
            assert_eq!(serde_json::to_string(&Element::Air).unwrap(), "\"air\"");
        }
    }
}
