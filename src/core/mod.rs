//! core
//!
//! Core domain types and title minting logic for cardmint.
//!
//! # Modules
//!
//! - [`types`] - Strong types: OwnerId, Title, Element
//! - [`word_bank`] - Versioned word pools used to compose titles
//! - [`composer`] - Candidate title composition
//! - [`allocator`] - Unique title allocation against the registry
//! - [`registrar`] - Conflict-safe owner-to-title binding
//! - [`stats`] - Gameplay attribute derivation
//! - [`clock`] - Millisecond clocks for title suffixes
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid owner ids and titles from reaching storage
//! - Uniqueness is enforced by the registry, never by in-memory state here
//! - Randomness and time are injected so every path is reproducible in tests

pub mod allocator;
pub mod clock;
pub mod composer;
pub mod config;
pub mod registrar;
pub mod stats;
pub mod types;
pub mod word_bank;
