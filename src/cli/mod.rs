//! cli
//!
//! Command-line interface layer for cardmint.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and install logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, builds a [`Context`]
//! and dispatches to the [`crate::engine`] for execution. Library errors are
//! wrapped with `anyhow` context here and nowhere else.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::config::Config;
use crate::engine::Minter;
use crate::ui::logging;
use crate::ui::output::{self, Verbosity};

/// Per-invocation state shared by command handlers.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    /// Registry file override from `--registry`.
    pub registry: Option<PathBuf>,
    pub seed: Option<u64>,
    pub json: bool,
    pub verbosity: Verbosity,
}

impl Context {
    /// Build the minter for this invocation.
    pub fn minter(&self) -> Result<Minter> {
        Minter::from_config(&self.config, self.registry.clone())
            .context("Failed to initialize minter")
    }

    /// Random generator, seeded when `--seed` was given.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init_logging(cli.debug);

    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    let loaded = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }
    if let Some(path) = loaded.config.path() {
        output::debug(format!("config: {}", path.display()), verbosity);
    }

    let ctx = Context {
        config: loaded.config,
        registry: cli.registry,
        seed: cli.seed,
        json: cli.json,
        verbosity,
    };

    commands::dispatch(cli.command, &ctx)
}
