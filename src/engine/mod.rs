//! engine
//!
//! Wires the core components into minting operations.
//!
//! # Architecture
//!
//! ```text
//! estimated value -> TitleAllocator -> StatDeriver -> GeneratedCardProperties
//!                                                         |
//!                          owner id -> NameRegistrar -----+
//! ```
//!
//! The engine holds no state of its own beyond what it is constructed with.
//! Every uniqueness decision is made by the registry.
//!
//! # Example
//!
//! ```
//! use cardmint::core::config::Config;
//! use cardmint::engine::Minter;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut config = Config::default();
//! config.file.registry = Some(cardmint::core::config::RegistryConfig {
//!     provider: Some("memory".into()),
//!     path: None,
//! });
//!
//! let minter = Minter::from_config(&config, None).unwrap();
//! let generated = minter.generate(42.0, &mut StdRng::seed_from_u64(1));
//! assert!(!generated.properties.card_title.is_empty());
//! ```

pub mod minter;

pub use minter::{EngineError, Generated, GeneratedCardProperties, Minted, Minter};
