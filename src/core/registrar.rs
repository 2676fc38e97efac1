//! core::registrar
//!
//! Idempotent, conflict-safe binding of owners to titles.
//!
//! # Algorithm
//!
//! 1. Look up the owner's current binding.
//! 2. Same title already bound: nothing to do.
//! 3. Different title bound: if another owner holds the requested title,
//!    keep the current binding; otherwise move the binding to the new title.
//! 4. No binding: insert. When the insert loses a title race, retry with
//!    `<title> <timestamp digits><random suffix>` up to
//!    `max_insert_attempts` total inserts.
//!
//! # Failure Policy
//!
//! Lost races are retried and, once the budget is spent, fail loudly with
//! [`RegistrarError::Exhausted`]; that is the only hard failure. A
//! disambiguated title that cannot be built (a suffix longer than the title
//! limit, possible only with unvalidated settings) spends an attempt like a
//! lost race. Any other registry error is logged and absorbed into
//! [`RegistrationOutcome::Degraded`]; callers that need the binding to be
//! durable must check [`RegistrationOutcome::is_durable`].
//!
//! Keeping the current title when the requested one belongs to another
//! owner avoids both title theft and leaving the owner without a title.
//! Whether that is the intended product behavior is unconfirmed.

use std::fmt;

use rand::Rng;
use thiserror::Error;

use super::clock::{last_digits, Clock};
use super::types::{OwnerId, Title, TypeError, MAX_TITLE_LEN};
use crate::registry::{RegistryError, TitleRecord, TitleRegistry};

/// Default number of insert attempts for a new owner.
pub const DEFAULT_MAX_INSERT_ATTEMPTS: u32 = 10;

/// Default number of timestamp digits in a disambiguated title.
pub const DEFAULT_TIMESTAMP_DIGITS: u32 = 4;

/// Default length of the random part of a disambiguated title.
pub const DEFAULT_RANDOM_SUFFIX_LEN: usize = 3;

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Registration tuning.
///
/// A disambiguated title adds `timestamp_digits + random_suffix_len` base-10
/// and base-36 characters, about 10^4 * 36^3 = 4.7e8 variants with the
/// defaults. Ten inserts losing a race to that many variants in a row means
/// the registry is misbehaving rather than contended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrarSettings {
    pub max_insert_attempts: u32,
    pub timestamp_digits: u32,
    pub random_suffix_len: usize,
}

impl Default for RegistrarSettings {
    fn default() -> Self {
        Self {
            max_insert_attempts: DEFAULT_MAX_INSERT_ATTEMPTS,
            timestamp_digits: DEFAULT_TIMESTAMP_DIGITS,
            random_suffix_len: DEFAULT_RANDOM_SUFFIX_LEN,
        }
    }
}

/// Hard registration failures.
#[derive(Debug, Error)]
pub enum RegistrarError {
    #[error("could not register a unique title for owner '{owner_id}' after {attempts} attempts")]
    Exhausted { owner_id: OwnerId, attempts: u32 },
}

/// What a registration call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// New binding inserted. `title` differs from the request when the
    /// insert had to be disambiguated.
    Created { title: Title, attempts: u32 },
    /// The owner already held the requested title.
    Unchanged { title: Title },
    /// The owner's binding moved to the requested title.
    Renamed { from: Title, to: Title },
    /// The requested title belongs to another owner; the current binding
    /// was kept.
    ConflictKept {
        kept: Title,
        requested: Title,
        held_by: Option<OwnerId>,
    },
    /// A registry error was absorbed; the binding may not be persisted.
    Degraded { error: RegistryError },
}

impl RegistrationOutcome {
    /// True when the owner is known to have a persisted binding.
    pub fn is_durable(&self) -> bool {
        !matches!(self, RegistrationOutcome::Degraded { .. })
    }

    /// The title the owner is bound to after the call, if known.
    pub fn bound_title(&self) -> Option<&Title> {
        match self {
            RegistrationOutcome::Created { title, .. } => Some(title),
            RegistrationOutcome::Unchanged { title } => Some(title),
            RegistrationOutcome::Renamed { to, .. } => Some(to),
            RegistrationOutcome::ConflictKept { kept, .. } => Some(kept),
            RegistrationOutcome::Degraded { .. } => None,
        }
    }

    /// Short machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistrationOutcome::Created { .. } => "created",
            RegistrationOutcome::Unchanged { .. } => "unchanged",
            RegistrationOutcome::Renamed { .. } => "renamed",
            RegistrationOutcome::ConflictKept { .. } => "conflict_kept",
            RegistrationOutcome::Degraded { .. } => "degraded",
        }
    }
}

impl fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationOutcome::Created { title, attempts: 1 } => {
                write!(f, "registered '{}'", title)
            }
            RegistrationOutcome::Created { title, attempts } => {
                write!(f, "registered '{}' after {} attempts", title, attempts)
            }
            RegistrationOutcome::Unchanged { title } => write!(f, "already registered as '{}'", title),
            RegistrationOutcome::Renamed { from, to } => write!(f, "renamed '{}' to '{}'", from, to),
            RegistrationOutcome::ConflictKept {
                kept,
                requested,
                held_by,
            } => {
                write!(f, "kept '{}': '{}' is taken", kept, requested)?;
                if let Some(holder) = held_by {
                    write!(f, " by '{}'", holder)?;
                }
                Ok(())
            }
            RegistrationOutcome::Degraded { error } => {
                write!(f, "registration not confirmed: {}", error)
            }
        }
    }
}

/// Internal failure split: absorbed vs. escalated.
enum Failure {
    Persistence(RegistryError),
    Hard(RegistrarError),
}

impl From<RegistryError> for Failure {
    fn from(e: RegistryError) -> Self {
        Failure::Persistence(e)
    }
}

/// Binds owners to titles in a registry.
pub struct NameRegistrar<'a> {
    registry: &'a dyn TitleRegistry,
    clock: &'a dyn Clock,
    settings: RegistrarSettings,
}

impl<'a> NameRegistrar<'a> {
    pub fn new(
        registry: &'a dyn TitleRegistry,
        clock: &'a dyn Clock,
        settings: RegistrarSettings,
    ) -> Self {
        Self {
            registry,
            clock,
            settings,
        }
    }

    /// Bind `owner_id` to `title`.
    ///
    /// # Errors
    ///
    /// Only [`RegistrarError`]; registry errors other than lost title races
    /// come back as [`RegistrationOutcome::Degraded`].
    pub fn register(
        &self,
        owner_id: &OwnerId,
        title: &Title,
        rng: &mut impl Rng,
    ) -> Result<RegistrationOutcome, RegistrarError> {
        match self.try_register(owner_id, title, rng) {
            Ok(outcome) => Ok(outcome),
            Err(Failure::Hard(e)) => {
                tracing::error!(owner_id = %owner_id, title = %title, error = %e, "title registration failed");
                Err(e)
            }
            Err(Failure::Persistence(error)) => {
                tracing::warn!(
                    owner_id = %owner_id,
                    title = %title,
                    error = %error,
                    "title registration not persisted; continuing"
                );
                Ok(RegistrationOutcome::Degraded { error })
            }
        }
    }

    fn try_register(
        &self,
        owner_id: &OwnerId,
        title: &Title,
        rng: &mut impl Rng,
    ) -> Result<RegistrationOutcome, Failure> {
        match self.registry.find_by_owner(owner_id)? {
            Some(existing) if &existing.title == title => {
                tracing::debug!(owner_id = %owner_id, title = %title, "title already registered");
                Ok(RegistrationOutcome::Unchanged {
                    title: existing.title,
                })
            }
            Some(existing) => self.rename(owner_id, existing.title, title),
            None => self.insert_new(owner_id, title, rng),
        }
    }

    fn rename(
        &self,
        owner_id: &OwnerId,
        current: Title,
        requested: &Title,
    ) -> Result<RegistrationOutcome, Failure> {
        if let Some(holder) = self.registry.find_by_title(requested)? {
            if &holder.owner_id != owner_id {
                return Ok(self.keep(owner_id, current, requested, Some(holder.owner_id)));
            }
        }

        match self.registry.update(owner_id, requested) {
            Ok(()) => {
                tracing::info!(owner_id = %owner_id, from = %current, to = %requested, "title renamed");
                Ok(RegistrationOutcome::Renamed {
                    from: current,
                    to: requested.clone(),
                })
            }
            // Claimed by someone else between the check and the update
            Err(e) if e.is_title_conflict() => Ok(self.keep(owner_id, current, requested, None)),
            Err(e) => Err(Failure::Persistence(e)),
        }
    }

    fn keep(
        &self,
        owner_id: &OwnerId,
        current: Title,
        requested: &Title,
        held_by: Option<OwnerId>,
    ) -> RegistrationOutcome {
        tracing::warn!(
            owner_id = %owner_id,
            kept = %current,
            requested = %requested,
            held_by = held_by.as_ref().map(OwnerId::as_str).unwrap_or("unknown"),
            "requested title belongs to another owner; keeping current title"
        );
        RegistrationOutcome::ConflictKept {
            kept: current,
            requested: requested.clone(),
            held_by,
        }
    }

    fn insert_new(
        &self,
        owner_id: &OwnerId,
        title: &Title,
        rng: &mut impl Rng,
    ) -> Result<RegistrationOutcome, Failure> {
        for attempt in 1..=self.settings.max_insert_attempts {
            let candidate = if attempt == 1 {
                title.clone()
            } else {
                match self.disambiguate(title, rng) {
                    Ok(candidate) => candidate,
                    // Only reachable with unvalidated settings; spends the attempt
                    Err(e) => {
                        tracing::warn!(owner_id = %owner_id, attempt, error = %e, "could not build a disambiguated title");
                        continue;
                    }
                }
            };

            match self
                .registry
                .insert(&TitleRecord::new(owner_id.clone(), candidate.clone()))
            {
                Ok(()) => {
                    tracing::info!(owner_id = %owner_id, title = %candidate, attempt, "title registered");
                    return Ok(RegistrationOutcome::Created {
                        title: candidate,
                        attempts: attempt,
                    });
                }
                Err(e) if e.is_title_conflict() => {
                    tracing::debug!(
                        owner_id = %owner_id,
                        title = %candidate,
                        attempt,
                        "insert lost title race"
                    );
                }
                Err(e) => return Err(Failure::Persistence(e)),
            }
        }

        Err(Failure::Hard(RegistrarError::Exhausted {
            owner_id: owner_id.clone(),
            attempts: self.settings.max_insert_attempts,
        }))
    }

    /// `<base> <timestamp digits><random suffix>`, with `base` shortened if
    /// the result would exceed the title length limit.
    fn disambiguate(&self, base: &Title, rng: &mut impl Rng) -> Result<Title, TypeError> {
        let mut tail = last_digits(self.clock.now_millis(), self.settings.timestamp_digits);
        tail.extend((0..self.settings.random_suffix_len).map(|_| {
            char::from(SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())])
        }));

        let room = MAX_TITLE_LEN.saturating_sub(tail.chars().count() + 1);
        let head: String = base.as_str().chars().take(room).collect();
        Title::new(format!("{} {}", head.trim_end(), tail))
    }
}
