//! core::stats
//!
//! Derivation of card statistics from an estimated value.
//!
//! # Formulas
//!
//! ```text
//! value_tier    = min(floor(v / 10) + 1, 10)
//! base_level    = max(20, value_tier * 8)
//! attack/defense/speed = clamp(base_level + uniform(-10..=9), 0, 100)
//! rarity_level  = clamp(floor(v / 15) + 1, 1, 10)
//! rating        = clamp(round1((avg_power * 0.4 + v * 0.3 + rarity * 0.3) / 10), 1.0, 10.0)
//! ```
//!
//! The estimated value is not validated. All arithmetic happens in `f64`
//! and is clamped before conversion, so negative, huge, or infinite inputs
//! still yield an in-range statset. `NaN` is treated as zero.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::types::Element;

/// Lower bound of the per-stat jitter, inclusive.
pub const STAT_JITTER_MIN: i32 = -10;
/// Upper bound of the per-stat jitter, inclusive.
pub const STAT_JITTER_MAX: i32 = 9;

/// Gameplay attributes derived for a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStatset {
    pub attack_power: u8,
    pub defense: u8,
    pub speed: u8,
    pub special_ability: String,
    pub element: Element,
    pub rarity_level: u8,
    pub rating: f64,
}

fn sanitize(estimated_value: f64) -> f64 {
    if estimated_value.is_nan() {
        0.0
    } else {
        estimated_value
    }
}

/// `min(floor(v / 10) + 1, 10)`. May be zero or negative for negative input.
pub fn value_tier(estimated_value: f64) -> f64 {
    ((sanitize(estimated_value) / 10.0).floor() + 1.0).min(10.0)
}

/// `max(20, value_tier * 8)`, always in `20..=80`.
pub fn base_level(estimated_value: f64) -> i32 {
    (value_tier(estimated_value) * 8.0).max(20.0) as i32
}

/// `clamp(floor(v / 15) + 1, 1, 10)`.
pub fn rarity_level(estimated_value: f64) -> u8 {
    ((sanitize(estimated_value) / 15.0).floor() + 1.0).clamp(1.0, 10.0) as u8
}

/// Rating from the three combat stats, the estimated value and rarity.
///
/// Rounded to one decimal and clamped to `1.0..=10.0`.
pub fn rating(attack_power: u8, defense: u8, speed: u8, estimated_value: f64, rarity: u8) -> f64 {
    let average_power = (f64::from(attack_power) + f64::from(defense) + f64::from(speed)) / 3.0;
    let raw =
        (average_power * 0.4 + sanitize(estimated_value) * 0.3 + f64::from(rarity) * 0.3) / 10.0;
    ((raw * 10.0).round() / 10.0).clamp(1.0, 10.0)
}

fn jittered_stat(base: i32, rng: &mut impl Rng) -> u8 {
    (base + rng.random_range(STAT_JITTER_MIN..=STAT_JITTER_MAX)).clamp(0, 100) as u8
}

/// Derive a full statset.
///
/// Randomness comes only from `rng`: three stat jitters, then the element,
/// then the ability, in that order. `abilities` must be non-empty (a
/// validated [`WordBank`](super::word_bank::WordBank) guarantees it); an
/// empty pool yields an empty ability name.
pub fn derive_stats(estimated_value: f64, abilities: &[String], rng: &mut impl Rng) -> CardStatset {
    let value = sanitize(estimated_value);
    let base = base_level(value);

    let attack_power = jittered_stat(base, rng);
    let defense = jittered_stat(base, rng);
    let speed = jittered_stat(base, rng);

    let element = Element::ALL[rng.random_range(0..Element::ALL.len())];
    let special_ability = abilities.choose(rng).cloned().unwrap_or_default();

    let rarity = rarity_level(value);
    let rating = rating(attack_power, defense, speed, value, rarity);

    CardStatset {
        attack_power,
        defense,
        speed,
        special_ability,
        element,
        rarity_level: rarity,
        rating,
    }
}
