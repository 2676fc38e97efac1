//! generate command - Allocate a title and derive stats for a card

use anyhow::{bail, Context as _, Result};
use serde::Serialize;

use crate::cli::Context;
use crate::core::registrar::RegistrationOutcome;
use crate::core::types::OwnerId;
use crate::engine::GeneratedCardProperties;
use crate::ui::output;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MintReport<'a> {
    owner_id: &'a OwnerId,
    outcome: &'static str,
    #[serde(flatten)]
    properties: &'a GeneratedCardProperties,
}

/// Generate card properties, optionally binding the title to an owner.
pub fn generate(ctx: &Context, value: f64, owner: Option<&str>, register: bool) -> Result<()> {
    if owner.is_some() && !register {
        output::warn("--owner has no effect without --register", ctx.verbosity);
    }

    let minter = ctx.minter()?;
    let mut rng = ctx.rng();

    if !register {
        let generated = minter.generate(value, &mut rng);
        output::debug(
            format!(
                "title from {} after {} attempt(s)",
                generated.source.as_str(),
                generated.attempts
            ),
            ctx.verbosity,
        );
        if ctx.json {
            output::json(&generated.properties)?;
        } else {
            print_properties(ctx, &generated.properties);
        }
        return Ok(());
    }

    let owner_id = match owner {
        Some(id) => OwnerId::new(id).context("Invalid owner id")?,
        None => OwnerId::new(uuid::Uuid::new_v4().to_string()).context("Invalid owner id")?,
    };

    let minted = minter
        .mint(&owner_id, value, &mut rng)
        .context("Failed to register title")?;

    if ctx.json {
        output::json(&MintReport {
            owner_id: &owner_id,
            outcome: minted.outcome.kind(),
            properties: &minted.properties,
        })?;
    } else {
        output::print(format!("Owner:   {}", owner_id), ctx.verbosity);
        print_properties(ctx, &minted.properties);
        output::success(&minted.outcome, ctx.verbosity);
    }

    if let RegistrationOutcome::Degraded { error } = &minted.outcome {
        bail!("title binding for '{}' was not persisted: {}", owner_id, error);
    }
    Ok(())
}

fn print_properties(ctx: &Context, properties: &GeneratedCardProperties) {
    if ctx.verbosity == output::Verbosity::Quiet {
        println!("{}", properties.card_title);
        return;
    }
    println!("Title:   {}", properties.card_title);
    println!("Attack:  {}", properties.attack_power);
    println!("Defense: {}", properties.defense);
    println!("Speed:   {}", properties.speed);
    println!("Ability: {}", properties.special_ability);
    println!("Element: {}", properties.element);
    println!("Rarity:  {}", properties.rarity_level);
    println!("Rating:  {:.1}", properties.rating);
}
