//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Config file to load instead of the default locations
//! - `--registry <path>`: Registry file to use instead of the configured one
//! - `--seed <u64>`: Seed the random generator for reproducible output
//! - `--json`: Machine-readable output
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cardmint - Unique titles and gameplay stats for collectible cards
#[derive(Parser, Debug)]
#[command(name = "cardmint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: $CARDMINT_CONFIG, then XDG, then ~/.cardmint)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Registry file for the file provider
    #[arg(long, global = true, value_name = "PATH")]
    pub registry: Option<PathBuf>,

    /// Seed for reproducible titles and stats
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a unique title and stats for a card
    #[command(
        name = "generate",
        long_about = "Allocate a title that is not yet registered and derive gameplay stats \
            from the card's estimated value.\n\n\
            Nothing is persisted unless --register is passed. With --register, the title \
            is bound to --owner (or a fresh UUID) and the bound title is printed, which may \
            differ from the allocated one if another writer claimed it first.",
        after_help = "\
EXAMPLES:
    # Preview properties for a card worth 42
    cardmint generate --value 42

    # Generate and bind the title to a card id
    cardmint generate --value 42 --owner card-123 --register

    # Reproducible output
    cardmint --seed 7 --json generate --value 42"
    )]
    Generate {
        /// Estimated value of the card
        #[arg(long, allow_negative_numbers = true)]
        value: f64,

        /// Owner id to bind the title to (default: random UUID)
        #[arg(long)]
        owner: Option<String>,

        /// Persist the title binding
        #[arg(long)]
        register: bool,
    },

    /// Allocate one unregistered title
    Allocate,

    /// Derive gameplay stats from an estimated value
    Stats {
        /// Estimated value of the card
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
    },

    /// Bind a title to an owner
    #[command(
        name = "register",
        long_about = "Bind a title to an owner id.\n\n\
            Registering the same pair twice is a no-op. If the owner already has a \
            different title and the requested one belongs to someone else, the current \
            title is kept. A new owner whose title is taken concurrently gets a \
            disambiguated title."
    )]
    Register {
        /// Owner id
        #[arg(long)]
        owner: String,

        /// Title to bind
        #[arg(long)]
        title: String,
    },

    /// Show the title bound to an owner
    Show {
        /// Owner id
        #[arg(long)]
        owner: String,
    },

    /// Show which owner holds a title
    Lookup {
        /// Title to look up
        #[arg(long)]
        title: String,
    },

    /// List all registered titles
    List,

    /// Show the effective configuration
    Config,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    cardmint completion bash > ~/.local/share/bash-completion/completions/cardmint

    # Zsh
    cardmint completion zsh > ~/.zfunc/_cardmint

    # Fish
    cardmint completion fish > ~/.config/fish/completions/cardmint.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
