//! registry::memory
//!
//! In-memory title registry.
//!
//! # Design
//!
//! `MemoryRegistry` enforces the same two uniqueness constraints as the
//! file-backed store, so it doubles as a deterministic fake for tests. It
//! can be configured to fail specific operations and to lose insert races
//! against a simulated concurrent writer.
//!
//! # Example
//!
//! ```
//! use cardmint::core::types::{OwnerId, Title};
//! use cardmint::registry::{FailOn, MemoryRegistry, RegistryError, TitleRecord, TitleRegistry};
//!
//! let registry = MemoryRegistry::new()
//!     .fail_on(FailOn::Update(RegistryError::Unavailable("maintenance".into())));
//!
//! let owner = OwnerId::new("card-1").unwrap();
//! let title = Title::new("Iron Golem").unwrap();
//! assert!(registry.update(&owner, &title).is_err());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::traits::{RegistryError, TitleRecord, TitleRegistry};
use crate::core::types::{OwnerId, Title};

/// Registry held entirely in memory.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    inner: Arc<Mutex<MemoryRegistryInner>>,
}

#[derive(Debug, Default)]
struct MemoryRegistryInner {
    by_owner: BTreeMap<OwnerId, Title>,
    by_title: HashMap<Title, OwnerId>,
    fail_on: Option<FailOn>,
    /// Inserts still to be lost to a simulated concurrent writer.
    pending_races: usize,
    races_lost: usize,
    operations: Vec<RegistryOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    FindByTitle(RegistryError),
    FindByOwner(RegistryError),
    Insert(RegistryError),
    Update(RegistryError),
    List(RegistryError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryOperation {
    FindByTitle { title: String },
    FindByOwner { owner_id: String },
    Insert { owner_id: String, title: String },
    Update { owner_id: String, title: String },
    List,
}

impl MemoryRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with records.
    ///
    /// # Errors
    ///
    /// Returns the first uniqueness violation among `records`.
    pub fn with_records(
        records: impl IntoIterator<Item = TitleRecord>,
    ) -> Result<Self, RegistryError> {
        let registry = Self::new();
        {
            let mut inner = registry.state();
            for record in records {
                inner.insert(record)?;
            }
        }
        Ok(registry)
    }

    /// Configure the registry to fail a specific operation on every call.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.state().fail_on = Some(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.state().fail_on = None;
    }

    /// Make the next `count` inserts lose a race.
    ///
    /// For each lost race, a phantom owner claims the requested title just
    /// before the insert is applied, and the insert fails with
    /// [`RegistryError::TitleTaken`].
    pub fn simulate_insert_races(self, count: usize) -> Self {
        self.state().pending_races = count;
        self
    }

    /// Number of inserts lost to simulated races so far.
    pub fn races_lost(&self) -> usize {
        self.state().races_lost
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<RegistryOperation> {
        self.state().operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        self.state().operations.clear();
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.state().by_owner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn state(&self) -> MutexGuard<'_, MemoryRegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MemoryRegistryInner {
    fn check_fail(&self, op: &RegistryOperation) -> Result<(), RegistryError> {
        let err = match (&self.fail_on, op) {
            (Some(FailOn::FindByTitle(e)), RegistryOperation::FindByTitle { .. })
            | (Some(FailOn::FindByOwner(e)), RegistryOperation::FindByOwner { .. })
            | (Some(FailOn::Insert(e)), RegistryOperation::Insert { .. })
            | (Some(FailOn::Update(e)), RegistryOperation::Update { .. })
            | (Some(FailOn::List(e)), RegistryOperation::List) => e.clone(),
            _ => return Ok(()),
        };
        Err(err)
    }

    fn record(&mut self, op: RegistryOperation) -> Result<(), RegistryError> {
        let result = self.check_fail(&op);
        self.operations.push(op);
        result
    }

    fn lookup_title(&self, title: &Title) -> Option<TitleRecord> {
        self.by_title
            .get(title)
            .map(|owner| TitleRecord::new(owner.clone(), title.clone()))
    }

    fn insert(&mut self, record: TitleRecord) -> Result<(), RegistryError> {
        if self.by_title.contains_key(&record.title) {
            return Err(RegistryError::TitleTaken(record.title.to_string()));
        }
        if self.by_owner.contains_key(&record.owner_id) {
            return Err(RegistryError::OwnerTaken(record.owner_id.to_string()));
        }
        self.by_title
            .insert(record.title.clone(), record.owner_id.clone());
        self.by_owner.insert(record.owner_id, record.title);
        Ok(())
    }

    /// Let a phantom concurrent writer claim `title` if a race is pending.
    fn lose_race(&mut self, title: &Title) -> Result<(), RegistryError> {
        if self.pending_races == 0 || self.by_title.contains_key(title) {
            return Ok(());
        }
        self.pending_races -= 1;
        self.races_lost += 1;
        let phantom = OwnerId::new(format!("concurrent-writer-{}", self.races_lost))
            .map_err(|e| RegistryError::WriteError(e.to_string()))?;
        self.insert(TitleRecord::new(phantom, title.clone()))
    }
}

impl TitleRegistry for MemoryRegistry {
    fn find_by_title(&self, title: &Title) -> Result<Option<TitleRecord>, RegistryError> {
        let mut inner = self.state();
        inner.record(RegistryOperation::FindByTitle {
            title: title.to_string(),
        })?;
        Ok(inner.lookup_title(title))
    }

    fn find_by_owner(&self, owner_id: &OwnerId) -> Result<Option<TitleRecord>, RegistryError> {
        let mut inner = self.state();
        inner.record(RegistryOperation::FindByOwner {
            owner_id: owner_id.to_string(),
        })?;
        Ok(inner
            .by_owner
            .get(owner_id)
            .map(|title| TitleRecord::new(owner_id.clone(), title.clone())))
    }

    fn insert(&self, record: &TitleRecord) -> Result<(), RegistryError> {
        let mut inner = self.state();
        inner.record(RegistryOperation::Insert {
            owner_id: record.owner_id.to_string(),
            title: record.title.to_string(),
        })?;
        inner.lose_race(&record.title)?;
        inner.insert(record.clone())
    }

    fn update(&self, owner_id: &OwnerId, title: &Title) -> Result<(), RegistryError> {
        let mut inner = self.state();
        inner.record(RegistryOperation::Update {
            owner_id: owner_id.to_string(),
            title: title.to_string(),
        })?;

        let current = inner
            .by_owner
            .get(owner_id)
            .cloned()
            .ok_or_else(|| RegistryError::OwnerNotFound(owner_id.to_string()))?;
        if &current == title {
            return Ok(());
        }
        if inner.by_title.contains_key(title) {
            return Err(RegistryError::TitleTaken(title.to_string()));
        }

        inner.by_title.remove(&current);
        inner.by_title.insert(title.clone(), owner_id.clone());
        inner.by_owner.insert(owner_id.clone(), title.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<TitleRecord>, RegistryError> {
        let mut inner = self.state();
        inner.record(RegistryOperation::List)?;
        Ok(inner
            .by_owner
            .iter()
            .map(|(owner, title)| TitleRecord::new(owner.clone(), title.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(s: &str) -> OwnerId {
        OwnerId::new(s).unwrap()
    }

    fn title(s: &str) -> Title {
        Title::new(s).unwrap()
    }

    fn record(o: &str, t: &str) -> TitleRecord {
        TitleRecord::new(owner(o), title(t))
    }

    #[test]
    fn insert_and_find_both_keys() {
        let registry = MemoryRegistry::new();
        registry.insert(&record("a", "Iron Golem")).unwrap();

        assert_eq!(
            registry.find_by_title(&title("Iron Golem")).unwrap(),
            Some(record("a", "Iron Golem"))
        );
        assert_eq!(
            registry.find_by_owner(&owner("a")).unwrap(),
            Some(record("a", "Iron Golem"))
        );
        assert!(registry.find_by_owner(&owner("b")).unwrap().is_none());
    }

    #[test]
    fn insert_rejects_duplicate_title() {
        let registry = MemoryRegistry::new();
        registry.insert(&record("a", "Iron Golem")).unwrap();

        let err = registry.insert(&record("b", "Iron Golem")).unwrap_err();
        assert_eq!(err, RegistryError::TitleTaken("Iron Golem".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn insert_rejects_duplicate_owner() {
        let registry = MemoryRegistry::new();
        registry.insert(&record("a", "Iron Golem")).unwrap();

        let err = registry.insert(&record("a", "Storm Wyrm")).unwrap_err();
        assert_eq!(err, RegistryError::OwnerTaken("a".into()));
        assert!(registry.find_by_title(&title("Storm Wyrm")).unwrap().is_none());
    }

    #[test]
    fn update_moves_title() {
        let registry = MemoryRegistry::new();
        registry.insert(&record("a", "Iron Golem")).unwrap();
        registry.update(&owner("a"), &title("Storm Wyrm")).unwrap();

        assert!(registry.find_by_title(&title("Iron Golem")).unwrap().is_none());
        assert_eq!(
            registry.find_by_owner(&owner("a")).unwrap(),
            Some(record("a", "Storm Wyrm"))
        );
    }

    #[test]
    fn update_same_title_is_noop() {
        let registry = MemoryRegistry::new();
        registry.insert(&record("a", "Iron Golem")).unwrap();
        registry.update(&owner("a"), &title("Iron Golem")).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn update_rejects_taken_title() {
        let registry =
            MemoryRegistry::with_records([record("a", "Iron Golem"), record("b", "Storm Wyrm")])
                .unwrap();

        let err = registry.update(&owner("a"), &title("Storm Wyrm")).unwrap_err();
        assert!(err.is_title_conflict());
        assert_eq!(
            registry.find_by_owner(&owner("a")).unwrap(),
            Some(record("a", "Iron Golem"))
        );
    }

    #[test]
    fn update_unknown_owner() {
        let registry = MemoryRegistry::new();
        let err = registry.update(&owner("ghost"), &title("X")).unwrap_err();
        assert_eq!(err, RegistryError::OwnerNotFound("ghost".into()));
    }

    #[test]
    fn with_records_rejects_duplicates() {
        let result =
            MemoryRegistry::with_records([record("a", "Iron Golem"), record("b", "Iron Golem")]);
        assert!(matches!(result, Err(RegistryError::TitleTaken(_))));
    }

    #[test]
    fn list_is_sorted_by_owner() {
        let registry = MemoryRegistry::with_records([
            record("c", "Three"),
            record("a", "One"),
            record("b", "Two"),
        ])
        .unwrap();

        let owners: Vec<String> = registry
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.owner_id.to_string())
            .collect();
        assert_eq!(owners, vec!["a", "b", "c"]);
    }

    #[test]
    fn fail_on_targets_one_operation() {
        let registry = MemoryRegistry::new()
            .fail_on(FailOn::Insert(RegistryError::WriteError("disk full".into())));

        let err = registry.insert(&record("a", "Iron Golem")).unwrap_err();
        assert_eq!(err, RegistryError::WriteError("disk full".into()));
        // Lookups still work
        assert!(registry.find_by_owner(&owner("a")).unwrap().is_none());

        registry.clear_fail_on();
        registry.insert(&record("a", "Iron Golem")).unwrap();
    }

    #[test]
    fn simulated_race_claims_title_first() {
        let registry = MemoryRegistry::new().simulate_insert_races(1);

        let err = registry.insert(&record("a", "Iron Golem")).unwrap_err();
        assert!(err.is_title_conflict());
        assert_eq!(registry.races_lost(), 1);

        let holder = registry.find_by_title(&title("Iron Golem")).unwrap().unwrap();
        assert_eq!(holder.owner_id.as_str(), "concurrent-writer-1");

        // Race budget spent; next insert goes through
        registry.insert(&record("a", "Storm Wyrm")).unwrap();
    }

    #[test]
    fn operations_are_recorded() {
        let registry = MemoryRegistry::new();
        registry.find_by_owner(&owner("a")).unwrap();
        registry.insert(&record("a", "Iron Golem")).unwrap();

        assert_eq!(
            registry.operations(),
            vec![
                RegistryOperation::FindByOwner {
                    owner_id: "a".into()
                },
                RegistryOperation::Insert {
                    owner_id: "a".into(),
                    title: "Iron Golem".into()
                },
            ]
        );

        registry.clear_operations();
        assert!(registry.operations().is_empty());
    }

    #[test]
    fn clones_share_state() {
        let registry = MemoryRegistry::new();
        let clone = registry.clone();
        clone.insert(&record("a", "Iron Golem")).unwrap();
        assert_eq!(registry.len(), 1);
    }
}
