//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the engine to execute the command
//! 3. Formats and displays output
//!
//! Handlers do NOT touch the registry except through the engine.

mod allocate;
mod completion;
mod config_cmd;
mod generate;
mod query;
mod register;
mod stats;

// Re-export command functions for testing and direct invocation
pub use allocate::allocate;
pub use completion::completion;
pub use config_cmd::show as config_show;
pub use generate::generate;
pub use query::{list, lookup, show};
pub use register::register;
pub use stats::stats;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Generate {
            value,
            owner,
            register,
        } => generate::generate(ctx, value, owner.as_deref(), register),
        Command::Allocate => allocate::allocate(ctx),
        Command::Stats { value } => stats::stats(ctx, value),
        Command::Register { owner, title } => register::register(ctx, &owner, &title),
        Command::Show { owner } => query::show(ctx, &owner),
        Command::Lookup { title } => query::lookup(ctx, &title),
        Command::List => query::list(ctx),
        Command::Config => config_cmd::show(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}
