//! stats command - Derive gameplay stats from an estimated value

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

pub fn stats(ctx: &Context, value: f64) -> Result<()> {
    let minter = ctx.minter()?;
    let stats = minter.stats(value, &mut ctx.rng());

    if ctx.json {
        output::json(&stats)?;
        return Ok(());
    }

    output::print(
        format!(
            "Attack:  {}\nDefense: {}\nSpeed:   {}\nAbility: {}\nElement: {}\nRarity:  {}\nRating:  {:.1}",
            stats.attack_power,
            stats.defense,
            stats.speed,
            stats.special_ability,
            stats.element,
            stats.rarity_level,
            stats.rating
        ),
        ctx.verbosity,
    );
    Ok(())
}
