//! register command - Bind a title to an owner

use anyhow::{bail, Context as _, Result};
use serde::Serialize;

use crate::cli::Context;
use crate::core::registrar::RegistrationOutcome;
use crate::core::types::{OwnerId, Title};
use crate::ui::output;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterReport<'a> {
    owner_id: &'a OwnerId,
    requested: &'a Title,
    outcome: &'static str,
    title: Option<&'a Title>,
    message: String,
}

pub fn register(ctx: &Context, owner: &str, title: &str) -> Result<()> {
    let owner_id = OwnerId::new(owner).context("Invalid owner id")?;
    let title = Title::new(title).context("Invalid title")?;

    let minter = ctx.minter()?;
    let outcome = minter
        .register(&owner_id, &title, &mut ctx.rng())
        .context("Failed to register title")?;

    if ctx.json {
        output::json(&RegisterReport {
            owner_id: &owner_id,
            requested: &title,
            outcome: outcome.kind(),
            title: outcome.bound_title(),
            message: outcome.to_string(),
        })?;
    } else {
        match &outcome {
            RegistrationOutcome::ConflictKept { .. } => output::warn(&outcome, ctx.verbosity),
            _ => output::success(&outcome, ctx.verbosity),
        }
    }

    if let RegistrationOutcome::Degraded { error } = &outcome {
        bail!("title binding for '{}' was not persisted: {}", owner_id, error);
    }
    Ok(())
}
