//! cardmint - Unique titles and gameplay stats for collectible cards
//!
//! cardmint composes display titles for cards from word pools, guarantees
//! their uniqueness against a persistent registry, and derives gameplay
//! attributes from a card's estimated value.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Wires configuration, registry, and core logic together
//! - [`core`] - Domain types, title allocation, registration, and stats
//! - [`registry`] - Owner-to-title storage with uniqueness enforcement
//! - [`ui`] - Output formatting and logging setup
//!
//! # Correctness Invariants
//!
//! cardmint maintains the following invariants:
//!
//! 1. At most one title per owner and one owner per title, enforced by the registry
//! 2. Title allocation never fails; an exhausted budget yields a fallback title
//! 3. Registration never steals a title held by another owner
//! 4. Stat derivation is total over every `f64` input

pub mod cli;
pub mod core;
pub mod engine;
pub mod registry;
pub mod ui;
