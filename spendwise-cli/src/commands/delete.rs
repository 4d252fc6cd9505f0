//! Delete commands - single and bulk transaction removal

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use super::{currency, get_context, today, truncate};
use crate::output;
use spendwise_core::services::BulkPeriod;

pub fn run(id: &str, force: bool) -> Result<()> {
    let ctx = get_context()?;
    let tx = ctx.ledger.get(id)?;

    // Confirm removal unless --force
    if !force {
        println!(
            "\n{}",
            format!(
                "This will delete '{}' ({} on {}).",
                tx.description,
                output::money(tx.amount, currency(&ctx.config)),
                tx.date
            )
            .yellow()
        );

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    ctx.ledger.delete(id)?;
    println!("\n{} Transaction deleted\n", "✓".green());

    Ok(())
}

pub fn run_bulk(period: BulkPeriod, force: bool) -> Result<()> {
    let ctx = get_context()?;
    let plan = ctx.ledger.bulk_delete_candidates(period, today())?;

    if plan.candidates.is_empty() {
        output::info(&format!(
            "No transactions between {} and {}",
            plan.range.start, plan.range.end
        ));
        return Ok(());
    }

    if !force {
        let symbol = currency(&ctx.config);
        let mut table = output::create_table();
        table.set_header(vec!["Date", "Description", "Type", "Amount"]);
        for tx in &plan.candidates {
            table.add_row(vec![
                tx.date.to_string(),
                truncate(&tx.description, 40),
                tx.kind.label().to_string(),
                output::money(tx.amount, symbol),
            ]);
        }
        println!("{}", table);
        println!(
            "\n{}",
            format!(
                "This will delete {} transaction(s) from {} to {}.",
                plan.candidates.len(),
                plan.range.start,
                plan.range.end
            )
            .yellow()
        );
        println!("{}\n", "This cannot be undone.".dimmed());

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let removed = ctx.ledger.bulk_delete(&plan.ids())?;
    println!("\n{} Deleted {} transaction(s)\n", "✓".green(), removed);

    Ok(())
}
