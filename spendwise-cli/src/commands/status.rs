//! Status command - this month's dashboard

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::{currency, get_context, today};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let today = today();
    let summary = ctx.report_service.dashboard(today)?;
    let budgets = ctx.report_service.category_budgets(today)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "summary": summary,
                "categoryBudgets": budgets,
            }))?
        );
        return Ok(());
    }

    let symbol = currency(&ctx.config);
    println!("{}", format!("Spending Overview - {}", summary.month).bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Monthly income", &output::money(summary.monthly_income, symbol)]);
    table.add_row(vec!["Income received", &output::money(summary.monthly_income_actual, symbol)]);
    table.add_row(vec!["Spent this month", &output::money(summary.monthly_spending, symbol)]);
    table.add_row(vec!["Monthly budget", &output::money(summary.budget_limit, symbol)]);
    table.add_row(vec!["Budget used", &format!("{}%", summary.budget_used_percentage)]);
    table.add_row(vec!["Remaining budget", &output::money(summary.remaining_budget, symbol)]);
    table.add_row(vec!["Impulse score", &format!("{}/100", summary.impulse_score)]);
    table.add_row(vec!["Transactions", &summary.transaction_count.to_string()]);
    println!("{}", table);

    if summary.budget_used_percentage >= 100 {
        output::error("You have exceeded your monthly budget");
    } else if summary.budget_used_percentage >= 80 {
        output::warning("You have used most of your monthly budget");
    }

    if !budgets.is_empty() {
        println!();
        println!("{}", "Category Budgets".bold());
        let mut table = output::create_table();
        table.set_header(vec!["Category", "Spent", "Limit", "Used"]);
        for usage in &budgets {
            table.add_row(vec![
                usage.category.clone(),
                output::money(usage.spent, symbol),
                output::money(usage.limit, symbol),
                output::percent_colored(usage.percentage, 80.0, 100.0),
            ]);
        }
        println!("{}", table);
    }

    if summary.transaction_count == 0 {
        println!();
        output::info("No transactions yet. Try `sw import <statement.csv>` or `sw add`.");
    }

    Ok(())
}
