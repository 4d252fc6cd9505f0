//! Add command - record a transaction by hand

use anyhow::Result;
use colored::Colorize;

use super::{currency, get_context, parse_money, parse_user_date, today};
use crate::output;
use spendwise_core::services::analytics::AlertLevel;
use spendwise_core::services::import::detect_category;
use spendwise_core::{Category, Mood, Transaction, TransactionType};

pub struct AddArgs {
    pub amount: String,
    pub description: String,
    pub kind: TransactionType,
    pub category: Option<Category>,
    pub date: Option<String>,
    pub mood: Option<Mood>,
    pub impulse: bool,
    pub json: bool,
}

pub fn run(args: AddArgs) -> Result<()> {
    let ctx = get_context()?;
    let today = today();

    let date = match &args.date {
        Some(raw) => parse_user_date(raw, &ctx.config)?,
        None => today,
    };
    let category = args
        .category
        .unwrap_or_else(|| detect_category(&args.description));

    if args.kind == TransactionType::Credit && (args.impulse || args.mood.is_some()) {
        output::warning("Mood and impulse are only tracked for debits; ignoring them");
    }

    let tx = Transaction::new(
        date,
        parse_money(&args.amount)?,
        args.kind,
        category,
        args.description,
    )
    .with_mood(args.mood)
    .with_impulse(args.impulse)
    .normalized();

    // Checked against the ledger before the new entry lands
    let alert = if ctx.settings.notifications()?.budget {
        ctx.report_service.budget_alert(&tx, today)?
    } else {
        None
    };

    let tx = ctx.ledger.add(tx)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "transaction": tx,
                "budgetAlert": alert,
            }))?
        );
        return Ok(());
    }

    let symbol = currency(&ctx.config);
    output::success(&format!(
        "Added {} {} - {} ({})",
        tx.kind,
        output::money(tx.amount, symbol),
        tx.description,
        tx.category
    ));
    println!("{}", format!("ID: {}", tx.id).dimmed());

    if let Some(alert) = alert {
        println!();
        let msg = format!(
            "{}: {} of {} spent ({:.0}%)",
            alert.category,
            output::money(alert.current_amount, symbol),
            output::money(alert.budget_limit, symbol),
            alert.percentage
        );
        match alert.level {
            AlertLevel::Exceeded => output::error(&format!("Budget exceeded! {}", msg)),
            AlertLevel::Warning => output::warning(&format!("Budget warning: {}", msg)),
        }
    }

    Ok(())
}
