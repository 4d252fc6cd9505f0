//! Settings commands - income, budgets, notifications and import behavior

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rust_decimal::Decimal;

use super::{currency, get_context, parse_money};
use crate::output;
use spendwise_core::config::{DateFallback, DateOrder, ImpulsePolicy};
use spendwise_core::Category;

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show all settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set monthly income
    Income {
        /// Amount (positive)
        amount: String,
    },

    /// Set the monthly budget and per-category limits
    Budget {
        /// Overall monthly limit
        #[arg(long)]
        monthly: Option<String>,
        /// Category limit as NAME=AMOUNT (repeatable, 0 removes the limit)
        #[arg(long = "category", value_name = "NAME=AMOUNT")]
        categories: Vec<String>,
    },

    /// Turn alert types on or off
    Notifications {
        #[arg(long)]
        spending: Option<bool>,
        #[arg(long)]
        budget: Option<bool>,
        #[arg(long)]
        weekly: Option<bool>,
        #[arg(long)]
        impulse: Option<bool>,
    },

    /// Display and date-reading preferences
    Locale {
        /// dayFirst (DD/MM/YYYY) or monthFirst (MM/DD/YYYY)
        #[arg(long)]
        date_order: Option<DateOrder>,
        /// Symbol printed before amounts (empty to hide)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Statement import behavior
    Import {
        /// unflagged or sampled
        #[arg(long, value_parser = parse_impulse_policy)]
        impulse_policy: Option<ImpulsePolicy>,
        /// Share of debit rows flagged when sampling (0 to 1)
        #[arg(long)]
        impulse_rate: Option<f64>,
        /// estimate or skip rows whose date cannot be read
        #[arg(long, value_parser = parse_date_fallback)]
        date_fallback: Option<DateFallback>,
        /// Generate labeled placeholder rows for unreadable files
        #[arg(long)]
        placeholder: Option<bool>,
    },

    /// Weekly impulse spending goal used by insights
    WeeklyLimit {
        /// Amount (positive)
        amount: String,
    },
}

pub fn run(command: SettingsCommands) -> Result<()> {
    match command {
        SettingsCommands::Show { json } => show(json),
        SettingsCommands::Income { amount } => {
            let ctx = get_context()?;
            let income = parse_money(&amount)?;
            ctx.settings.set_income(income)?;
            output::success(&format!(
                "Monthly income set to {}",
                output::money(income, currency(&ctx.config))
            ));
            Ok(())
        }
        SettingsCommands::Budget {
            monthly,
            categories,
        } => set_budget(monthly, categories),
        SettingsCommands::Notifications {
            spending,
            budget,
            weekly,
            impulse,
        } => {
            let ctx = get_context()?;
            let mut prefs = ctx.settings.notifications()?;
            if let Some(v) = spending {
                prefs.spending = v;
            }
            if let Some(v) = budget {
                prefs.budget = v;
            }
            if let Some(v) = weekly {
                prefs.weekly = v;
            }
            if let Some(v) = impulse {
                prefs.impulse = v;
            }
            ctx.settings.set_notifications(&prefs)?;
            output::success("Notification preferences saved");
            Ok(())
        }
        SettingsCommands::Locale {
            date_order,
            currency,
        } => {
            let ctx = get_context()?;
            let mut config = ctx.config.clone();
            if let Some(order) = date_order {
                config.locale.date_order = order;
            }
            if let Some(symbol) = currency {
                config.locale.currency_symbol = Some(symbol);
            }
            config.save(&ctx.data_dir)?;
            output::success("Locale settings saved");
            Ok(())
        }
        SettingsCommands::Import {
            impulse_policy,
            impulse_rate,
            date_fallback,
            placeholder,
        } => {
            let ctx = get_context()?;
            let mut config = ctx.config.clone();
            if let Some(policy) = impulse_policy {
                config.import.impulse_policy = policy;
            }
            if let Some(rate) = impulse_rate {
                if !(0.0..=1.0).contains(&rate) {
                    bail!("Impulse rate must be between 0 and 1");
                }
                config.import.impulse_rate = rate;
            }
            if let Some(fallback) = date_fallback {
                config.import.date_fallback = fallback;
            }
            if let Some(enabled) = placeholder {
                config.import.placeholder_fallback = enabled;
            }
            config.save(&ctx.data_dir)?;
            output::success("Import settings saved");
            Ok(())
        }
        SettingsCommands::WeeklyLimit { amount } => {
            let ctx = get_context()?;
            let limit = parse_money(&amount)?;
            if limit <= Decimal::ZERO {
                bail!("Weekly limit must be greater than zero");
            }
            let mut config = ctx.config.clone();
            config.insights.weekly_impulse_limit = limit;
            config.save(&ctx.data_dir)?;
            output::success(&format!(
                "Weekly impulse limit set to {}",
                output::money(limit, currency(&ctx.config))
            ));
            Ok(())
        }
    }
}

fn show(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let income = ctx.settings.income()?;
    let budgets = ctx.settings.budgets()?;
    let prefs = ctx.settings.notifications()?;
    let config = &ctx.config;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "income": income,
                "budgets": budgets,
                "notifications": prefs,
                "dateOrder": config.locale.date_order,
                "currencySymbol": config.locale.currency_symbol,
                "impulsePolicy": config.import.impulse_policy,
                "impulseRate": config.import.impulse_rate,
                "dateFallback": config.import.date_fallback,
                "placeholderFallback": config.import.placeholder_fallback,
                "weeklyImpulseLimit": config.insights.weekly_impulse_limit,
            }))?
        );
        return Ok(());
    }

    let symbol = currency(config);
    let on_off = |v: bool| if v { "on".green() } else { "off".dimmed() }.to_string();

    println!("{}", "Settings".bold());
    println!("{}", format!("Data directory: {}", ctx.data_dir.display()).dimmed());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Monthly income", &output::money(income, symbol)]);
    table.add_row(vec!["Monthly budget", &output::money(budgets.monthly, symbol)]);
    table.add_row(vec![
        "Weekly impulse limit",
        &output::money(config.insights.weekly_impulse_limit, symbol),
    ]);
    table.add_row(vec!["Date order", date_order_label(config.locale.date_order)]);
    table.add_row(vec!["Currency symbol", symbol]);
    table.add_row(vec![
        "Impulse flags on import",
        match config.import.impulse_policy {
            ImpulsePolicy::Unflagged => "unflagged",
            ImpulsePolicy::Sampled => "sampled",
        },
    ]);
    table.add_row(vec![
        "Impulse sample rate",
        &format!("{:.0}%", config.import.effective_impulse_rate() * 100.0),
    ]);
    table.add_row(vec![
        "Unreadable dates",
        match config.import.date_fallback {
            DateFallback::Estimate => "estimate",
            DateFallback::Skip => "skip",
        },
    ]);
    table.add_row(vec!["Placeholder data", &on_off(config.import.placeholder_fallback)]);
    table.add_row(vec!["Spending alerts", &on_off(prefs.spending)]);
    table.add_row(vec!["Budget alerts", &on_off(prefs.budget)]);
    table.add_row(vec!["Weekly summary", &on_off(prefs.weekly)]);
    table.add_row(vec!["Impulse alerts", &on_off(prefs.impulse)]);
    println!("{}", table);

    if !budgets.categories.is_empty() {
        println!();
        let mut table = output::create_table();
        table.set_header(vec!["Category", "Limit"]);
        for (category, limit) in &budgets.categories {
            table.add_row(vec![category.clone(), output::money(*limit, symbol)]);
        }
        println!("{}", table);
    }

    Ok(())
}

fn set_budget(monthly: Option<String>, categories: Vec<String>) -> Result<()> {
    if monthly.is_none() && categories.is_empty() {
        bail!("Nothing to change. Pass --monthly and/or --category NAME=AMOUNT");
    }

    let ctx = get_context()?;
    let mut budgets = ctx.settings.budgets()?;

    if let Some(raw) = monthly {
        budgets.monthly = parse_money(&raw)?;
    }
    for entry in &categories {
        let (name, amount) = parse_category_limit(entry)?;
        if amount.is_zero() {
            budgets.categories.remove(&name);
        } else {
            budgets.categories.insert(name, amount);
        }
    }

    ctx.settings.set_budgets(&budgets)?;
    output::success("Budget saved");
    Ok(())
}

/// Split `NAME=AMOUNT`, normalizing the name to its category label
fn parse_category_limit(entry: &str) -> Result<(String, Decimal)> {
    let (name, amount) = entry
        .split_once('=')
        .with_context(|| format!("Expected NAME=AMOUNT, got '{}'", entry))?;
    let category = Category::from_label(name);
    Ok((category.label().to_string(), parse_money(amount)?))
}

fn date_order_label(order: DateOrder) -> &'static str {
    match order {
        DateOrder::DayFirst => "DD/MM/YYYY",
        DateOrder::MonthFirst => "MM/DD/YYYY",
    }
}

fn parse_impulse_policy(raw: &str) -> std::result::Result<ImpulsePolicy, String> {
    match raw.trim().to_lowercase().as_str() {
        "unflagged" | "off" | "none" => Ok(ImpulsePolicy::Unflagged),
        "sampled" | "random" => Ok(ImpulsePolicy::Sampled),
        other => Err(format!("Unknown impulse policy: {} (use unflagged or sampled)", other)),
    }
}

fn parse_date_fallback(raw: &str) -> std::result::Result<DateFallback, String> {
    match raw.trim().to_lowercase().as_str() {
        "estimate" => Ok(DateFallback::Estimate),
        "skip" => Ok(DateFallback::Skip),
        other => Err(format!("Unknown date fallback: {} (use estimate or skip)", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_limit() {
        let (name, amount) = parse_category_limit("food & dining=12,000").unwrap();
        assert_eq!(name, "Food & Dining");
        assert_eq!(amount, Decimal::new(12000, 0));

        let (name, _) = parse_category_limit("Pets=500").unwrap();
        assert_eq!(name, "Pets");

        assert!(parse_category_limit("Shopping").is_err());
    }

    #[test]
    fn test_parse_policies() {
        assert_eq!(parse_impulse_policy("Sampled").unwrap(), ImpulsePolicy::Sampled);
        assert_eq!(parse_date_fallback("skip").unwrap(), DateFallback::Skip);
        assert!(parse_date_fallback("guess").is_err());
    }
}
