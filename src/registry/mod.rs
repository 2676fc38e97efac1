//! registry
//!
//! Persistent owner-to-title bindings with global title uniqueness.
//!
//! # Architecture
//!
//! Bindings are stored through the [`TitleRegistry`] trait, which has two
//! implementations:
//!
//! - [`FileRegistry`]: JSON file at `~/.cardmint/titles.json` (default)
//! - [`MemoryRegistry`]: process-local maps, with failure injection for tests
//!
//! Both enforce one binding per owner and one binding per title on every
//! write. Nothing above this layer caches registry contents.
//!
//! # Provider Selection
//!
//! ```
//! use cardmint::registry::create_registry;
//!
//! let registry = create_registry("memory", None).unwrap();
//! assert!(registry.list().unwrap().is_empty());
//! ```

mod file_store;
mod memory;
mod traits;

pub use file_store::{default_path, FileRegistry, REGISTRY_FILE_VERSION};
pub use memory::{FailOn, MemoryRegistry, RegistryOperation};
pub use traits::{RegistryError, TitleRecord, TitleRegistry};

use std::path::PathBuf;

/// The default registry provider name.
pub const DEFAULT_PROVIDER: &str = "file";

/// Names accepted by [`create_registry`].
pub fn valid_provider_names() -> &'static [&'static str] {
    &["file", "memory"]
}

/// Create a registry based on the provider name.
///
/// # Providers
///
/// - `"file"` (default): [`FileRegistry`] at `path`, or
///   `~/.cardmint/titles.json` when `path` is `None`
/// - `"memory"`: [`MemoryRegistry`]; `path` is ignored
///
/// # Errors
///
/// - Unknown provider name
/// - Home directory lookup failure for the default file location
pub fn create_registry(
    provider: &str,
    path: Option<PathBuf>,
) -> Result<Box<dyn TitleRegistry>, RegistryError> {
    match provider {
        "file" => match path {
            Some(path) => Ok(Box::new(FileRegistry::with_path(path))),
            None => Ok(Box::new(FileRegistry::new()?)),
        },
        "memory" => Ok(Box::new(MemoryRegistry::new())),
        other => Err(RegistryError::ProviderNotAvailable(format!(
            "unknown registry provider: '{}' (valid: {})",
            other,
            valid_provider_names().join(", ")
        ))),
    }
}
