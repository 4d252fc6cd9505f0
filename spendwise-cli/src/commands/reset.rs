//! Reset command - delete all stored data

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use super::get_context;

pub fn run(force: bool) -> Result<()> {
    let ctx = get_context()?;
    let count = ctx.ledger.list()?.len();

    if !force {
        println!(
            "\n{}",
            format!(
                "This will delete {} transaction(s), your income, budgets, reflections and goals.",
                count
            )
            .yellow()
        );
        println!("{}\n", "Settings in settings.json are kept.".dimmed());

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    ctx.settings.wipe()?;
    println!("\n{} All data deleted\n", "✓".green());

    Ok(())
}
