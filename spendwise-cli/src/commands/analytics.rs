//! Analytics command - spending breakdowns and trends

use anyhow::Result;
use colored::Colorize;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{currency, get_context, today};
use crate::output;
use spendwise_core::services::TimeRange;

/// Width of the widest bar in the weekday chart
const BAR_WIDTH: usize = 30;

pub fn run(range: TimeRange, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let summary = ctx.report_service.analytics(range, today())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let symbol = currency(&ctx.config);
    println!(
        "{}",
        format!(
            "Spending Analytics - {} ({} transactions in range)",
            summary.month,
            summary.range_transaction_count
        )
        .bold()
    );
    println!();

    let change = if summary.spending_change > 0.0 {
        format!("+{:.1}%", summary.spending_change).red().to_string()
    } else {
        format!("{:.1}%", summary.spending_change).green().to_string()
    };
    println!(
        "This month:   {}  ({} vs last month)",
        output::money(summary.current_month_spending, symbol),
        change
    );
    println!(
        "Last month:   {}",
        output::money(summary.previous_month_spending, symbol)
    );
    println!("Impulse ratio: {}%", summary.impulse_ratio);
    println!(
        "Top category: {}",
        summary
            .top_category
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "None".to_string())
    );

    if !summary.category_breakdown.is_empty() {
        println!();
        println!("{}", "Category Breakdown".bold());
        let total = summary
            .category_breakdown
            .iter()
            .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.amount))
            .to_f64()
            .unwrap_or(0.0);
        let mut table = output::create_table();
        table.set_header(vec!["Category", "Spent", "Share", "Impulse", "Planned"]);
        for entry in &summary.category_breakdown {
            let split = summary
                .impulse_split
                .iter()
                .find(|s| s.category == entry.category);
            let share = if total > 0.0 {
                entry.amount.to_f64().unwrap_or(0.0) / total * 100.0
            } else {
                0.0
            };
            table.add_row(vec![
                entry.category.to_string(),
                output::money(entry.amount, symbol),
                format!("{:.1}%", share),
                split
                    .map(|s| output::money(s.impulse, symbol))
                    .unwrap_or_default(),
                split
                    .map(|s| output::money(s.normal, symbol))
                    .unwrap_or_default(),
            ]);
        }
        println!("{}", table);
    }

    println!();
    println!("{}", "Monthly Trend".bold());
    let mut table = output::create_table();
    table.set_header(vec!["Month", "Spending", "Income"]);
    for point in &summary.monthly_trend {
        table.add_row(vec![
            format!("{} {}", point.label, point.month.year),
            output::money(point.spending, symbol),
            output::money(point.income, symbol),
        ]);
    }
    println!("{}", table);

    let peak = summary
        .weekday_pattern
        .iter()
        .map(|d| d.amount)
        .max()
        .unwrap_or(Decimal::ZERO);
    if peak > Decimal::ZERO {
        println!();
        println!("{}", "Spending by Weekday".bold());
        for day in &summary.weekday_pattern {
            let ratio = day.amount.to_f64().unwrap_or(0.0) / peak.to_f64().unwrap_or(1.0);
            let width = (ratio * BAR_WIDTH as f64).round() as usize;
            println!(
                "  {}  {:<width$}  {}",
                day.day,
                "█".repeat(width).cyan(),
                output::money(day.amount, symbol),
                width = BAR_WIDTH
            );
        }
    }

    Ok(())
}
