//! List command - transaction history with running totals

use anyhow::Result;
use colored::Colorize;
use rust_decimal::prelude::ToPrimitive;

use super::{currency, get_context, truncate};
use crate::output;
use spendwise_core::services::{HistoryQuery, SortField, SortOrder};
use spendwise_core::TransactionType;

pub fn run(
    search: Option<String>,
    kind: Option<TransactionType>,
    category: Option<String>,
    sort: SortField,
    order: SortOrder,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let query = HistoryQuery {
        search,
        kind,
        category,
        sort,
        order,
    };
    let mut rows = ctx.report_service.history(&query)?;
    let total = rows.len();
    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        output::info("No transactions found");
        return Ok(());
    }

    let symbol = currency(&ctx.config);
    let mut table = output::create_table();
    table.set_header(vec![
        "#", "Date", "Description", "Category", "Amount", "Left", "% Spent", "Impulse", "Mood", "ID",
    ]);

    for row in &rows {
        let tx = &row.transaction;
        let amount = match tx.kind {
            TransactionType::Debit => format!("-{}", output::money(tx.amount, symbol)).red().to_string(),
            TransactionType::Credit => format!("+{}", output::money(tx.amount, symbol)).green().to_string(),
        };
        let (left, spent) = if tx.is_debit() {
            (
                output::money(row.amount_left, symbol),
                output::percent_colored(row.percentage_spent.to_f64().unwrap_or(0.0), 80.0, 100.0),
            )
        } else {
            (String::new(), String::new())
        };

        table.add_row(vec![
            row.serial.to_string(),
            tx.date.to_string(),
            truncate(&tx.description, 32),
            tx.category.to_string(),
            amount,
            left,
            spent,
            if tx.is_impulse { "Yes" } else { "" }.to_string(),
            tx.mood.map(|m| m.label().to_string()).unwrap_or_default(),
            truncate(&tx.id, 8),
        ]);
    }

    println!("{}", table);
    if rows.len() < total {
        println!("{}", format!("Showing {} of {} transactions", rows.len(), total).dimmed());
    }

    Ok(())
}
