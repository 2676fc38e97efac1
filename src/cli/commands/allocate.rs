//! allocate command - Print one unregistered title

use anyhow::Result;
use serde::Serialize;

use crate::cli::Context;
use crate::ui::output;

#[derive(Serialize)]
struct AllocateReport<'a> {
    title: &'a str,
    source: &'static str,
    attempts: u32,
}

/// Allocate a title without registering it.
pub fn allocate(ctx: &Context) -> Result<()> {
    let minter = ctx.minter()?;
    let allocation = minter.allocate(&mut ctx.rng());

    if ctx.json {
        output::json(&AllocateReport {
            title: &allocation.title,
            source: allocation.source.as_str(),
            attempts: allocation.attempts,
        })?;
        return Ok(());
    }

    println!("{}", allocation.title);
    output::debug(
        format!(
            "source: {}, attempts: {}",
            allocation.source.as_str(),
            allocation.attempts
        ),
        ctx.verbosity,
    );
    Ok(())
}
