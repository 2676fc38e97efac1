//! engine::minter
//!
//! The [`Minter`] owns the registry, word bank, clock, and settings for one
//! process and exposes the card minting operations on top of them.

use std::path::PathBuf;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::allocator::{Allocation, AllocationSource, AllocatorSettings, TitleAllocator};
use crate::core::clock::{Clock, SystemClock};
use crate::core::composer::CandidateComposer;
use crate::core::config::Config;
use crate::core::registrar::{
    NameRegistrar, RegistrarError, RegistrarSettings, RegistrationOutcome,
};
use crate::core::stats::{derive_stats, CardStatset};
use crate::core::types::{Element, OwnerId, Title, TypeError};
use crate::core::word_bank::{WordBank, WordBankError};
use crate::registry::{create_registry, RegistryError, TitleRecord, TitleRegistry};

/// Errors from minting operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("word bank error: {0}")]
    WordBank(#[from] WordBankError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Registrar(#[from] RegistrarError),

    #[error("allocated title is not registrable: {0}")]
    InvalidTitle(#[from] TypeError),
}

/// Properties generated for a new card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCardProperties {
    pub card_title: String,
    pub attack_power: u8,
    pub defense: u8,
    pub speed: u8,
    pub special_ability: String,
    pub element: Element,
    pub rarity_level: u8,
    pub rating: f64,
}

impl GeneratedCardProperties {
    fn new(card_title: String, stats: CardStatset) -> Self {
        Self {
            card_title,
            attack_power: stats.attack_power,
            defense: stats.defense,
            speed: stats.speed,
            special_ability: stats.special_ability,
            element: stats.element,
            rarity_level: stats.rarity_level,
            rating: stats.rating,
        }
    }
}

/// Generated properties plus how the title was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub properties: GeneratedCardProperties,
    pub source: AllocationSource,
    pub attempts: u32,
}

/// Result of [`Minter::mint`].
#[derive(Debug, Clone, PartialEq)]
pub struct Minted {
    /// Properties with `card_title` set to the bound title when it changed
    /// during registration.
    pub properties: GeneratedCardProperties,
    pub source: AllocationSource,
    pub outcome: RegistrationOutcome,
}

/// Card minting service.
pub struct Minter {
    registry: Box<dyn TitleRegistry>,
    word_bank: WordBank,
    clock: Box<dyn Clock>,
    allocator: AllocatorSettings,
    registrar: RegistrarSettings,
}

impl Minter {
    pub fn new(
        registry: Box<dyn TitleRegistry>,
        word_bank: WordBank,
        clock: Box<dyn Clock>,
        allocator: AllocatorSettings,
        registrar: RegistrarSettings,
    ) -> Self {
        Self {
            registry,
            word_bank,
            clock,
            allocator,
            registrar,
        }
    }

    /// Build a minter from configuration.
    ///
    /// `registry_path` overrides `registry.path` from the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the word bank cannot be loaded or the registry
    /// provider cannot be created.
    pub fn from_config(config: &Config, registry_path: Option<PathBuf>) -> Result<Self, EngineError> {
        let word_bank = match config.word_bank_path() {
            Some(path) => WordBank::load(path)?,
            None => WordBank::builtin()?,
        };
        let path = registry_path.or_else(|| config.registry_path().map(PathBuf::from));
        let registry = create_registry(config.registry_provider(), path)?;

        tracing::debug!(
            provider = config.registry_provider(),
            word_bank = %word_bank.fingerprint(),
            "minter ready"
        );

        Ok(Self::new(
            registry,
            word_bank,
            Box::new(SystemClock::new()),
            config.allocator_settings(),
            config.registrar_settings(),
        ))
    }

    pub fn registry(&self) -> &dyn TitleRegistry {
        self.registry.as_ref()
    }

    pub fn word_bank(&self) -> &WordBank {
        &self.word_bank
    }

    /// Allocate a title that is unbound at the time of the check.
    pub fn allocate(&self, rng: &mut impl Rng) -> Allocation {
        TitleAllocator::new(
            self.registry.as_ref(),
            CandidateComposer::new(&self.word_bank),
            self.clock.as_ref(),
            self.allocator,
        )
        .allocate(rng)
    }

    pub fn stats(&self, estimated_value: f64, rng: &mut impl Rng) -> CardStatset {
        derive_stats(estimated_value, self.word_bank.abilities(), rng)
    }

    /// Allocate a title and derive stats. Nothing is persisted.
    pub fn generate(&self, estimated_value: f64, rng: &mut impl Rng) -> Generated {
        let allocation = self.allocate(rng);
        let stats = self.stats(estimated_value, rng);
        Generated {
            properties: GeneratedCardProperties::new(allocation.title, stats),
            source: allocation.source,
            attempts: allocation.attempts,
        }
    }

    /// Bind `title` to `owner_id`.
    pub fn register(
        &self,
        owner_id: &OwnerId,
        title: &Title,
        rng: &mut impl Rng,
    ) -> Result<RegistrationOutcome, RegistrarError> {
        NameRegistrar::new(self.registry.as_ref(), self.clock.as_ref(), self.registrar)
            .register(owner_id, title, rng)
    }

    /// Generate properties and bind the title to `owner_id`.
    pub fn mint(
        &self,
        owner_id: &OwnerId,
        estimated_value: f64,
        rng: &mut impl Rng,
    ) -> Result<Minted, EngineError> {
        let generated = self.generate(estimated_value, rng);
        let title = Title::new(generated.properties.card_title.as_str())?;
        let outcome = self.register(owner_id, &title, rng)?;

        let mut properties = generated.properties;
        if let Some(bound) = outcome.bound_title() {
            properties.card_title = bound.to_string();
        }

        Ok(Minted {
            properties,
            source: generated.source,
            outcome,
        })
    }

    pub fn show(&self, owner_id: &OwnerId) -> Result<Option<TitleRecord>, RegistryError> {
        self.registry.find_by_owner(owner_id)
    }

    pub fn lookup(&self, title: &Title) -> Result<Option<TitleRecord>, RegistryError> {
        self.registry.find_by_title(title)
    }

    pub fn list(&self) -> Result<Vec<TitleRecord>, RegistryError> {
        self.registry.list()
    }
}
