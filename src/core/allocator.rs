//! core::allocator
//!
//! Unique title allocation.
//!
//! # Algorithm
//!
//! Draw a candidate from the [`CandidateComposer`], look it up in the
//! registry, and return the first candidate that is not bound (first-fit).
//! After `max_attempts` taken candidates, draw one more candidate, append
//! the last `fallback_digits` digits of the clock, and return it.
//!
//! # Invariants
//!
//! - Allocation never fails; exhausting the budget always yields a fallback
//! - A registry-sourced title was unbound at the moment it was checked. It
//!   is not reserved; a concurrent writer may still claim it before the
//!   registrar binds it
//! - A fallback title is never checked against the registry
//!
//! # Budget
//!
//! The built-in word bank composes roughly 197,000 distinct titles, a third
//! of draws landing in the smaller two-word spaces (about 4,000 and 2,900
//! titles each). While the registry holds a small fraction of that space,
//! a draw collides with probability close to the occupied fraction, and
//! 100 consecutive collisions are vanishingly rare. The fallback only
//! matters once the two- and three-word spaces are close to saturated.

use rand::Rng;

use super::clock::{last_digits, Clock};
use super::composer::CandidateComposer;
use super::types::Title;
use crate::registry::TitleRegistry;

/// Default number of candidates checked before falling back.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Default number of timestamp digits appended to a fallback title.
pub const DEFAULT_FALLBACK_DIGITS: u32 = 4;

/// Allocation tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorSettings {
    /// Candidates checked against the registry before falling back.
    pub max_attempts: u32,
    /// Timestamp digits appended to the fallback title.
    pub fallback_digits: u32,
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            fallback_digits: DEFAULT_FALLBACK_DIGITS,
        }
    }
}

/// Which path produced an allocated title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationSource {
    /// Candidate confirmed unbound in the registry.
    Registry,
    /// Budget exhausted; title carries a timestamp suffix and was not checked.
    Fallback,
}

impl AllocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationSource::Registry => "registry",
            AllocationSource::Fallback => "fallback",
        }
    }
}

/// Result of an allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub title: String,
    /// Registry checks performed.
    pub attempts: u32,
    pub source: AllocationSource,
}

/// Allocates titles that are unbound in a registry.
pub struct TitleAllocator<'a> {
    registry: &'a dyn TitleRegistry,
    composer: CandidateComposer<'a>,
    clock: &'a dyn Clock,
    settings: AllocatorSettings,
}

impl<'a> TitleAllocator<'a> {
    pub fn new(
        registry: &'a dyn TitleRegistry,
        composer: CandidateComposer<'a>,
        clock: &'a dyn Clock,
        settings: AllocatorSettings,
    ) -> Self {
        Self {
            registry,
            composer,
            clock,
            settings,
        }
    }

    /// Allocate one title.
    pub fn allocate(&self, rng: &mut impl Rng) -> Allocation {
        for attempt in 1..=self.settings.max_attempts {
            let candidate = self.composer.compose(rng);
            if self.is_unbound(&candidate, attempt) {
                tracing::debug!(title = %candidate, attempt, "allocated title");
                return Allocation {
                    title: candidate,
                    attempts: attempt,
                    source: AllocationSource::Registry,
                };
            }
        }

        let title = format!(
            "{} {}",
            self.composer.compose(rng),
            last_digits(self.clock.now_millis(), self.settings.fallback_digits)
        );
        tracing::warn!(
            title = %title,
            attempts = self.settings.max_attempts,
            "allocation budget exhausted, using unverified fallback title"
        );
        Allocation {
            title,
            attempts: self.settings.max_attempts,
            source: AllocationSource::Fallback,
        }
    }

    /// A lookup error counts as taken: the candidate could not be verified.
    fn is_unbound(&self, candidate: &str, attempt: u32) -> bool {
        let title = match Title::new(candidate) {
            Ok(title) => title,
            Err(e) => {
                tracing::warn!(candidate, error = %e, "composed candidate is not a valid title");
                return false;
            }
        };

        match self.registry.find_by_title(&title) {
            Ok(None) => true,
            Ok(Some(record)) => {
                tracing::debug!(
                    title = %title,
                    owner_id = %record.owner_id,
                    attempt,
                    "candidate already taken"
                );
                false
            }
            Err(e) => {
                tracing::warn!(title = %title, attempt, error = %e, "title lookup failed");
                false
            }
        }
    }
}
