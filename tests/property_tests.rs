//! Property-based tests for core minting logic.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cardmint::core::clock::{last_digits, SteppingClock};
use cardmint::core::composer::{CandidateComposer, TitlePattern};
use cardmint::core::registrar::{NameRegistrar, RegistrarSettings};
use cardmint::core::stats::{base_level, derive_stats, rarity_level, value_tier};
use cardmint::core::types::{OwnerId, Title};
use cardmint::core::word_bank::WordBank;
use cardmint::registry::{MemoryRegistry, TitleRegistry};

fn abilities() -> Vec<String> {
    WordBank::builtin().unwrap().abilities().to_vec()
}

fn is_one_decimal(x: f64) -> bool {
    ((x * 10.0).round() / 10.0 - x).abs() < 1e-9
}

/// Strategy for estimated values, including the awkward ones.
fn any_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -1_000.0f64..10_000.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
        1 => Just(f64::MAX),
        1 => Just(-0.0),
    ]
}

proptest! {
    #[test]
    fn stats_are_always_in_range(value in any_value(), seed in any::<u64>()) {
        let stats = derive_stats(value, &abilities(), &mut StdRng::seed_from_u64(seed));

        prop_assert!(stats.attack_power <= 100);
        prop_assert!(stats.defense <= 100);
        prop_assert!(stats.speed <= 100);
        prop_assert!((1..=10).contains(&stats.rarity_level));
        prop_assert!((1.0..=10.0).contains(&stats.rating));
        prop_assert!(is_one_decimal(stats.rating));
        prop_assert!(abilities().contains(&stats.special_ability));
    }

    #[test]
    fn stats_stay_near_base_level(value in 0.0f64..1_000.0, seed in any::<u64>()) {
        let base = base_level(value);
        let stats = derive_stats(value, &abilities(), &mut StdRng::seed_from_u64(seed));

        for stat in [stats.attack_power, stats.defense, stats.speed] {
            let stat = stat as i32;
            prop_assert!(stat >= (base - 10).max(0), "{} below {}", stat, base);
            prop_assert!(stat <= (base + 9).min(100), "{} above {}", stat, base);
        }
    }

    #[test]
    fn tiers_are_monotonic(a in 0.0f64..500.0, b in 0.0f64..500.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(value_tier(lo) <= value_tier(hi));
        prop_assert!(base_level(lo) <= base_level(hi));
        prop_assert!(rarity_level(lo) <= rarity_level(hi));
        prop_assert!((20..=80).contains(&base_level(hi)));
    }

    #[test]
    fn composed_titles_follow_a_pattern(seed in any::<u64>()) {
        let bank = WordBank::builtin().unwrap();
        let composer = CandidateComposer::new(&bank);
        let (title, pattern) = composer.compose_with_pattern(&mut StdRng::seed_from_u64(seed));

        let words: Vec<&str> = title.split(' ').collect();
        let has = |pool: &[String], word: &str| pool.iter().any(|w| w == word);
        match pattern {
            TitlePattern::PrefixCharacter => {
                prop_assert_eq!(words.len(), 2);
                prop_assert!(has(bank.prefixes(), words[0]));
                prop_assert!(has(bank.characters(), words[1]));
            }
            TitlePattern::CharacterSuffix => {
                prop_assert_eq!(words.len(), 2);
                prop_assert!(has(bank.characters(), words[0]));
                prop_assert!(has(bank.suffixes(), words[1]));
            }
            TitlePattern::PrefixSuffixCharacter => {
                prop_assert_eq!(words.len(), 3);
                prop_assert!(has(bank.prefixes(), words[0]));
                prop_assert!(has(bank.suffixes(), words[1]));
                prop_assert!(has(bank.characters(), words[2]));
            }
        }
        prop_assert!(Title::new(title.as_str()).is_ok());
    }

    #[test]
    fn last_digits_has_fixed_width(millis in any::<i64>(), digits in 1u32..=18) {
        let s = last_digits(millis, digits);
        prop_assert_eq!(s.len(), digits as usize);
        prop_assert!(s.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn printable_owner_ids_are_accepted(id in "[a-zA-Z0-9][a-zA-Z0-9 _.:-]{0,60}[a-zA-Z0-9]") {
        let owner = OwnerId::new(id.clone()).unwrap();
        prop_assert_eq!(owner.as_str(), id.as_str());
    }

    #[test]
    fn registrations_never_break_uniqueness(
        ops in prop::collection::vec((0usize..6, 0usize..6), 1..40),
        seed in any::<u64>(),
    ) {
        let registry = MemoryRegistry::new();
        let clock = SteppingClock::new(1_700_000_000_000, 1);
        let registrar = NameRegistrar::new(&registry, &clock, RegistrarSettings::default());
        let mut rng = StdRng::seed_from_u64(seed);

        for (owner, title) in ops {
            let owner_id = OwnerId::new(format!("card-{owner}")).unwrap();
            let title = Title::new(format!("Title {title}")).unwrap();
            let outcome = registrar.register(&owner_id, &title, &mut rng).unwrap();
            prop_assert!(outcome.is_durable());

            let bound = registry.find_by_owner(&owner_id).unwrap().unwrap();
            prop_assert_eq!(Some(&bound.title), outcome.bound_title());
        }

        let records = registry.list().unwrap();
        let owners: HashSet<_> = records.iter().map(|r| r.owner_id.clone()).collect();
        let titles: HashSet<_> = records.iter().map(|r| r.title.clone()).collect();
        prop_assert_eq!(owners.len(), records.len());
        prop_assert_eq!(titles.len(), records.len());
    }
}
