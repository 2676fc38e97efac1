//! registry::traits
//!
//! Title registry trait definition.
//!
//! # Design
//!
//! The `TitleRegistry` trait is the persistent store that binds owner ids
//! to titles. It is keyed two ways, by title and by owner id, and each key
//! is unique. Implementations enforce both constraints on every write; the
//! allocator and registrar hold no in-memory copy of registry state.
//!
//! A write that would break title uniqueness fails with
//! [`RegistryError::TitleTaken`]. Callers rely on that specific variant to
//! detect lost races, so implementations must not report it for anything
//! else.
//!
//! # Example
//!
//! ```
//! use cardmint::core::types::{OwnerId, Title};
//! use cardmint::registry::{MemoryRegistry, TitleRecord, TitleRegistry};
//!
//! let registry = MemoryRegistry::new();
//! let record = TitleRecord::new(
//!     OwnerId::new("card-1").unwrap(),
//!     Title::new("Iron Golem").unwrap(),
//! );
//! registry.insert(&record).unwrap();
//!
//! let found = registry.find_by_title(&record.title).unwrap();
//! assert_eq!(found, Some(record));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{OwnerId, Title};

/// Errors from registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The title is already bound to some owner.
    #[error("title already taken: {0}")]
    TitleTaken(String),

    /// The owner already has a title binding.
    #[error("owner already has a title: {0}")]
    OwnerTaken(String),

    /// No binding exists for the owner.
    #[error("no title bound to owner: {0}")]
    OwnerNotFound(String),

    /// Failed to read from the registry.
    #[error("failed to read registry: {0}")]
    ReadError(String),

    /// Failed to write to the registry.
    #[error("failed to write registry: {0}")]
    WriteError(String),

    /// Registry could not be reached.
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    /// Provider not available or not configured.
    #[error("registry provider not available: {0}")]
    ProviderNotAvailable(String),
}

impl RegistryError {
    /// True for a violation of the unique-title constraint.
    pub fn is_title_conflict(&self) -> bool {
        matches!(self, RegistryError::TitleTaken(_))
    }
}

/// Durable binding between an owning record and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleRecord {
    pub owner_id: OwnerId,
    pub title: Title,
}

impl TitleRecord {
    pub fn new(owner_id: OwnerId, title: Title) -> Self {
        Self { owner_id, title }
    }
}

/// Trait for title registry providers.
///
/// Implementations must be thread-safe (Send + Sync). Every call is
/// blocking and may perform I/O.
pub trait TitleRegistry: Send + Sync {
    /// Look up the binding that holds `title`.
    fn find_by_title(&self, title: &Title) -> Result<Option<TitleRecord>, RegistryError>;

    /// Look up the binding for `owner_id`.
    fn find_by_owner(&self, owner_id: &OwnerId) -> Result<Option<TitleRecord>, RegistryError>;

    /// Insert a new binding.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::TitleTaken`] if any owner already holds the title
    /// - [`RegistryError::OwnerTaken`] if the owner already has a binding
    fn insert(&self, record: &TitleRecord) -> Result<(), RegistryError>;

    /// Change the title of an existing binding.
    ///
    /// Updating to the title the owner already holds is a no-op.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::OwnerNotFound`] if the owner has no binding
    /// - [`RegistryError::TitleTaken`] if a different owner holds the title
    fn update(&self, owner_id: &OwnerId, title: &Title) -> Result<(), RegistryError>;

    /// All bindings, sorted by owner id.
    fn list(&self) -> Result<Vec<TitleRecord>, RegistryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = RegistryError::TitleTaken("Iron Golem".into());
        assert!(err.to_string().contains("Iron Golem"));
        assert!(err.to_string().contains("taken"));

        let err = RegistryError::OwnerNotFound("card-1".into());
        assert!(err.to_string().contains("card-1"));

        let err = RegistryError::WriteError("disk full".into());
        assert!(err.to_string().contains("write"));

        let err = RegistryError::Unavailable("connection refused".into());
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn only_title_taken_is_a_title_conflict() {
        assert!(RegistryError::TitleTaken("x".into()).is_title_conflict());
        assert!(!RegistryError::OwnerTaken("x".into()).is_title_conflict());
        assert!(!RegistryError::WriteError("x".into()).is_title_conflict());
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = TitleRecord::new(
            OwnerId::new("card-1").unwrap(),
            Title::new("Iron Golem").unwrap(),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"ownerId":"card-1","title":"Iron Golem"}"#);
    }
}
