//! Integration tests for allocation and registration over the file registry.
//!
//! These tests run the allocator and registrar against a real registry file
//! and check that uniqueness holds across registry instances and threads
//! sharing that file.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use cardmint::core::allocator::{AllocationSource, AllocatorSettings, TitleAllocator};
use cardmint::core::clock::{SteppingClock, SystemClock};
use cardmint::core::composer::CandidateComposer;
use cardmint::core::registrar::{NameRegistrar, RegistrarSettings, RegistrationOutcome};
use cardmint::core::types::{OwnerId, Title};
use cardmint::core::word_bank::WordBank;
use cardmint::registry::{FileRegistry, RegistryError, TitleRecord, TitleRegistry};

// =============================================================================
// Test Fixtures
// =============================================================================

fn owner(id: &str) -> OwnerId {
    OwnerId::new(id).unwrap()
}

fn title(t: &str) -> Title {
    Title::new(t).unwrap()
}

fn registry_at(dir: &Path) -> FileRegistry {
    FileRegistry::with_path(dir.join("titles.json"))
}

// =============================================================================
// Shared File
// =============================================================================

#[test]
fn instances_sharing_a_file_see_each_other() {
    let temp = TempDir::new().unwrap();
    let a = registry_at(temp.path());
    let b = registry_at(temp.path());

    a.insert(&TitleRecord::new(owner("card-1"), title("Iron Golem")))
        .unwrap();

    let found = b.find_by_title(&title("Iron Golem")).unwrap().unwrap();
    assert_eq!(found.owner_id, owner("card-1"));

    let err = b
        .insert(&TitleRecord::new(owner("card-2"), title("Iron Golem")))
        .unwrap_err();
    assert_eq!(err, RegistryError::TitleTaken("Iron Golem".into()));
    assert_eq!(a.list().unwrap().len(), 1);
}

#[test]
fn registrar_disambiguates_across_instances() {
    let temp = TempDir::new().unwrap();
    let first = registry_at(temp.path());
    let second = registry_at(temp.path());
    let clock = SteppingClock::new(1_700_000_001_234, 1);
    let mut rng = StdRng::seed_from_u64(11);

    let outcome = NameRegistrar::new(&first, &clock, RegistrarSettings::default())
        .register(&owner("card-1"), &title("Storm Wyrm"), &mut rng)
        .unwrap();
    assert!(matches!(outcome, RegistrationOutcome::Created { attempts: 1, .. }));

    let outcome = NameRegistrar::new(&second, &clock, RegistrarSettings::default())
        .register(&owner("card-2"), &title("Storm Wyrm"), &mut rng)
        .unwrap();
    let RegistrationOutcome::Created { title: bound, attempts } = outcome else {
        panic!("expected created outcome");
    };
    assert_eq!(attempts, 2);
    assert!(bound.as_str().starts_with("Storm Wyrm "));
    assert_ne!(bound, title("Storm Wyrm"));

    let titles: HashSet<Title> = first.list().unwrap().into_iter().map(|r| r.title).collect();
    assert_eq!(titles.len(), 2);
}

#[test]
fn conflicting_rename_keeps_current_title_on_disk() {
    let temp = TempDir::new().unwrap();
    let registry = registry_at(temp.path());
    let clock = SteppingClock::new(0, 1);
    let registrar = NameRegistrar::new(&registry, &clock, RegistrarSettings::default());
    let mut rng = StdRng::seed_from_u64(12);

    registrar
        .register(&owner("a"), &title("Ember Knight"), &mut rng)
        .unwrap();
    registrar
        .register(&owner("b"), &title("Frost Queen"), &mut rng)
        .unwrap();

    let outcome = registrar
        .register(&owner("a"), &title("Frost Queen"), &mut rng)
        .unwrap();
    assert_eq!(outcome.kind(), "conflict_kept");

    // A fresh instance reads what was persisted
    let reopened = registry_at(temp.path());
    assert_eq!(
        reopened.find_by_owner(&owner("a")).unwrap().unwrap().title,
        title("Ember Knight")
    );
    assert_eq!(
        reopened.find_by_owner(&owner("b")).unwrap().unwrap().title,
        title("Frost Queen")
    );
}

#[test]
fn idempotent_registration_writes_one_record() {
    let temp = TempDir::new().unwrap();
    let registry = registry_at(temp.path());
    let clock = SteppingClock::new(0, 1);
    let registrar = NameRegistrar::new(&registry, &clock, RegistrarSettings::default());
    let mut rng = StdRng::seed_from_u64(13);

    for _ in 0..3 {
        registrar
            .register(&owner("card-7"), &title("Void Herald"), &mut rng)
            .unwrap();
    }
    assert_eq!(registry.list().unwrap().len(), 1);
}

#[test]
fn corrupt_file_degrades_registration() {
    let temp = TempDir::new().unwrap();
    let registry = registry_at(temp.path());
    std::fs::write(registry.path(), "{ not json").unwrap();

    let clock = SteppingClock::new(0, 1);
    let outcome = NameRegistrar::new(&registry, &clock, RegistrarSettings::default())
        .register(&owner("card-1"), &title("Iron Golem"), &mut StdRng::seed_from_u64(14))
        .unwrap();
    assert!(!outcome.is_durable());
    assert!(matches!(
        outcome,
        RegistrationOutcome::Degraded {
            error: RegistryError::ReadError(_)
        }
    ));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_registrations_keep_titles_unique() {
    let temp = TempDir::new().unwrap();
    let path = Arc::new(temp.path().join("titles.json"));
    let clock = Arc::new(SystemClock::new());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let path = Arc::clone(&path);
            let clock = Arc::clone(&clock);
            thread::spawn(move || {
                let registry = FileRegistry::with_path(path.as_ref().clone());
                let registrar =
                    NameRegistrar::new(&registry, clock.as_ref(), RegistrarSettings::default());
                let mut rng = StdRng::seed_from_u64(worker);
                for i in 0..5 {
                    let id = owner(&format!("w{worker}-{i}"));
                    let outcome = registrar
                        .register(&id, &title("Shared Title"), &mut rng)
                        .unwrap();
                    assert!(outcome.is_durable());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let records = FileRegistry::with_path(path.as_ref().clone()).list().unwrap();
    assert_eq!(records.len(), 40);
    let titles: HashSet<&Title> = records.iter().map(|r| &r.title).collect();
    assert_eq!(titles.len(), 40);
    assert_eq!(
        records
            .iter()
            .filter(|r| r.title.as_str() == "Shared Title")
            .count(),
        1
    );
}

#[test]
fn allocations_avoid_registered_titles() {
    let temp = TempDir::new().unwrap();
    let registry = registry_at(temp.path());
    let bank = WordBank::from_pools(
        ["Iron", "Storm"],
        ["Warden", "Breaker"],
        ["Golem", "Wyrm"],
        ["Stone Gaze"],
    )
    .unwrap();
    let clock = SteppingClock::new(1_700_000_000_000, 1);
    // Large enough budget that the last free title is always found
    let settings = AllocatorSettings {
        max_attempts: 2_000,
        fallback_digits: 4,
    };
    let allocator =
        TitleAllocator::new(&registry, CandidateComposer::new(&bank), &clock, settings);
    let registrar = NameRegistrar::new(&registry, &clock, RegistrarSettings::default());
    let mut rng = StdRng::seed_from_u64(15);

    // 2*2 + 2*2 + 2*2*2 = 16 distinct titles
    assert_eq!(bank.title_space(), 16);
    for i in 0..16 {
        let allocation = allocator.allocate(&mut rng);
        assert_eq!(allocation.source, AllocationSource::Registry, "allocation {i}");
        let outcome = registrar
            .register(
                &owner(&format!("card-{i}")),
                &title(&allocation.title),
                &mut rng,
            )
            .unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Created { attempts: 1, .. }));
    }

    // The space is full: the next allocation must fall back
    let allocation = allocator.allocate(&mut rng);
    assert_eq!(allocation.source, AllocationSource::Fallback);
    assert!(registry
        .find_by_title(&title(&allocation.title))
        .unwrap()
        .is_none());
}
