//! registry::file_store
//!
//! File-backed title registry.
//!
//! # Storage
//!
//! - `<path>` - JSON document with a `version` and a `records` array
//! - `<path>.lock` - lock file held with an OS-level exclusive lock while
//!   a write is in progress
//!
//! # Invariants
//!
//! - Every write re-reads the file while holding the lock, so uniqueness
//!   checks see writes made by other processes
//! - Writes are atomic (write to temp file, then rename); readers never see
//!   a partial file and do not take the lock
//! - Lock acquisition blocks until the lock is free
//!
//! # Example
//!
//! ```no_run
//! use cardmint::core::types::{OwnerId, Title};
//! use cardmint::registry::{FileRegistry, TitleRecord, TitleRegistry};
//!
//! let registry = FileRegistry::new()?;
//! registry.insert(&TitleRecord::new(
//!     OwnerId::new("card-1")?,
//!     Title::new("Iron Golem")?,
//! ))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use super::traits::{RegistryError, TitleRecord, TitleRegistry};
use crate::core::types::{OwnerId, Title};

/// On-disk layout version.
pub const REGISTRY_FILE_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    version: u32,
    records: Vec<TitleRecord>,
}

impl RegistryFile {
    fn empty() -> Self {
        Self {
            version: REGISTRY_FILE_VERSION,
            records: Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.version != REGISTRY_FILE_VERSION {
            return Err(RegistryError::ReadError(format!(
                "unsupported registry version {} (expected {})",
                self.version, REGISTRY_FILE_VERSION
            )));
        }
        let mut owners = HashSet::new();
        let mut titles = HashSet::new();
        for record in &self.records {
            if !owners.insert(&record.owner_id) {
                return Err(RegistryError::ReadError(format!(
                    "corrupt registry: owner '{}' appears twice",
                    record.owner_id
                )));
            }
            if !titles.insert(&record.title) {
                return Err(RegistryError::ReadError(format!(
                    "corrupt registry: title '{}' appears twice",
                    record.title
                )));
            }
        }
        Ok(())
    }
}

/// Title registry stored in a JSON file.
///
/// The default location is `~/.cardmint/titles.json`.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    /// Create a file registry at the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, RegistryError> {
        Ok(Self {
            path: default_path()?,
        })
    }

    /// Create a file registry at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the path to the registry file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        sibling(&self.path, "lock")
    }

    fn read(&self) -> Result<RegistryFile, RegistryError> {
        if !self.path.exists() {
            return Ok(RegistryFile::empty());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| RegistryError::ReadError(format!("cannot read registry file: {}", e)))?;
        let file: RegistryFile = serde_json::from_str(&content)
            .map_err(|e| RegistryError::ReadError(format!("cannot parse registry file: {}", e)))?;
        file.validate()?;
        Ok(file)
    }

    fn write(&self, file: &RegistryFile) -> Result<(), RegistryError> {
        let content = serde_json::to_string_pretty(file)
            .map_err(|e| RegistryError::WriteError(format!("cannot serialize registry: {}", e)))?;

        let temp_path = sibling(&self.path, "tmp");
        {
            let mut tmp = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| RegistryError::WriteError(format!("cannot create temp file: {}", e)))?;
            tmp.write_all(content.as_bytes())
                .map_err(|e| RegistryError::WriteError(format!("cannot write registry: {}", e)))?;
            tmp.sync_all()
                .map_err(|e| RegistryError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| RegistryError::WriteError(format!("cannot rename temp file: {}", e)))
    }

    /// Run `mutate` against the current contents under the write lock and
    /// persist the result if it succeeds.
    fn modify<F>(&self, mutate: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut RegistryFile) -> Result<(), RegistryError>,
    {
        let _lock = WriteLock::acquire(&self.lock_path())?;
        let mut file = self.read()?;
        mutate(&mut file)?;
        file.records.sort_by(|a, b| a.owner_id.cmp(&b.owner_id));
        self.write(&file)
    }
}

impl TitleRegistry for FileRegistry {
    fn find_by_title(&self, title: &Title) -> Result<Option<TitleRecord>, RegistryError> {
        Ok(self.read()?.records.into_iter().find(|r| &r.title == title))
    }

    fn find_by_owner(&self, owner_id: &OwnerId) -> Result<Option<TitleRecord>, RegistryError> {
        Ok(self
            .read()?
            .records
            .into_iter()
            .find(|r| &r.owner_id == owner_id))
    }

    fn insert(&self, record: &TitleRecord) -> Result<(), RegistryError> {
        self.modify(|file| {
            if file.records.iter().any(|r| r.title == record.title) {
                return Err(RegistryError::TitleTaken(record.title.to_string()));
            }
            if file.records.iter().any(|r| r.owner_id == record.owner_id) {
                return Err(RegistryError::OwnerTaken(record.owner_id.to_string()));
            }
            file.records.push(record.clone());
            Ok(())
        })
    }

    fn update(&self, owner_id: &OwnerId, title: &Title) -> Result<(), RegistryError> {
        self.modify(|file| {
            if file
                .records
                .iter()
                .any(|r| &r.title == title && &r.owner_id != owner_id)
            {
                return Err(RegistryError::TitleTaken(title.to_string()));
            }
            let record = file
                .records
                .iter_mut()
                .find(|r| &r.owner_id == owner_id)
                .ok_or_else(|| RegistryError::OwnerNotFound(owner_id.to_string()))?;
            record.title = title.clone();
            Ok(())
        })
    }

    fn list(&self) -> Result<Vec<TitleRecord>, RegistryError> {
        let mut records = self.read()?.records;
        records.sort_by(|a, b| a.owner_id.cmp(&b.owner_id));
        Ok(records)
    }
}

/// Default registry location, `~/.cardmint/titles.json`.
pub fn default_path() -> Result<PathBuf, RegistryError> {
    let home = dirs::home_dir()
        .ok_or_else(|| RegistryError::ReadError("cannot determine home directory".into()))?;
    Ok(home.join(".cardmint").join("titles.json"))
}

/// `titles.json` -> `titles.json.<ext>`
fn sibling(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Exclusive lock on the registry lock file, released on drop.
#[derive(Debug)]
struct WriteLock {
    file: File,
}

impl WriteLock {
    fn acquire(path: &Path) -> Result<Self, RegistryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RegistryError::WriteError(format!("cannot create directory: {}", e)))?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| RegistryError::WriteError(format!("cannot open lock file: {}", e)))?;
        file.lock_exclusive()
            .map_err(|e| RegistryError::WriteError(format!("cannot acquire lock: {}", e)))?;
        Ok(Self { file })
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(error = %e, "failed to release registry lock");
        }
    }
}
