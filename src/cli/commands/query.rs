//! show, lookup, and list commands - Read the registry

use anyhow::{bail, Context as _, Result};

use crate::cli::Context;
use crate::core::types::{OwnerId, Title};
use crate::ui::output;

/// Print the record bound to an owner.
pub fn show(ctx: &Context, owner: &str) -> Result<()> {
    let owner_id = OwnerId::new(owner).context("Invalid owner id")?;
    let minter = ctx.minter()?;

    let Some(record) = minter.show(&owner_id).context("Failed to read registry")? else {
        bail!("no title registered for owner '{}'", owner_id);
    };

    if ctx.json {
        output::json(&record)?;
    } else {
        println!("{}", record.title);
    }
    Ok(())
}

/// Print the record holding a title.
pub fn lookup(ctx: &Context, title: &str) -> Result<()> {
    let title = Title::new(title).context("Invalid title")?;
    let minter = ctx.minter()?;

    let Some(record) = minter.lookup(&title).context("Failed to read registry")? else {
        bail!("title '{}' is not registered", title);
    };

    if ctx.json {
        output::json(&record)?;
    } else {
        println!("{}", record.owner_id);
    }
    Ok(())
}

/// Print every record, sorted by owner id.
pub fn list(ctx: &Context) -> Result<()> {
    let minter = ctx.minter()?;
    let records = minter.list().context("Failed to read registry")?;

    if ctx.json {
        output::json(&records)?;
        return Ok(());
    }

    if records.is_empty() {
        output::print("No titles registered.", ctx.verbosity);
        return Ok(());
    }
    let lines: Vec<String> = records.iter().map(output::format_record).collect();
    println!("{}", output::format_list(&lines, ""));
    Ok(())
}
