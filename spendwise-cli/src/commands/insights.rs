//! Insights command - impulse control and emotional spending

use anyhow::Result;
use colored::Colorize;

use super::{currency, get_context, today};
use crate::output;
use spendwise_core::services::insights::{ControlLevel, RiskLevel};

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let insights = ctx.report_service.insights(today())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    if !insights.has_data() {
        output::info("No behavioral data yet.");
        println!(
            "{}",
            "Add transactions with --mood and --impulse to see patterns emerge.".dimmed()
        );
        return Ok(());
    }

    let symbol = currency(&ctx.config);
    println!("{}", "Behavioral Insights".bold());
    println!();

    let control = match insights.control {
        ControlLevel::Excellent => insights.control.label().green(),
        ControlLevel::Moderate => insights.control.label().yellow(),
        ControlLevel::NeedsAttention => insights.control.label().red(),
    };
    println!("Impulse score:      {}/100  {}", insights.impulse_score, control);

    let risk = match insights.emotional_risk {
        RiskLevel::Low => insights.emotional_risk.label().green(),
        RiskLevel::Medium => insights.emotional_risk.label().yellow(),
        RiskLevel::High => insights.emotional_risk.label().red(),
    };
    println!(
        "Emotional spending: {}% of purchases track mood  {}",
        insights.emotional_percentage, risk
    );

    let goal = &insights.weekly_goal;
    println!(
        "Weekly impulse:     {} of {} ({})",
        output::money(goal.spent, symbol),
        output::money(goal.limit, symbol),
        output::percent_colored(goal.progress, 80.0, 100.0)
    );

    if !insights.mood_spending.is_empty() {
        println!();
        println!("{}", "Mood-Based Spending".bold());
        let mut table = output::create_table();
        table.set_header(vec!["Mood", "Spent", "Purchases"]);
        for mood in &insights.mood_spending {
            table.add_row(vec![
                mood.mood.label().to_string(),
                output::money(mood.amount, symbol),
                mood.count.to_string(),
            ]);
        }
        println!("{}", table);
    }

    println!();
    println!("{}", "Impulse Score Trend".bold());
    let mut table = output::create_table();
    table.set_header(vec!["Week", "From", "To", "Score"]);
    for week in &insights.weekly_trend {
        table.add_row(vec![
            week.week.clone(),
            week.start.to_string(),
            week.end.to_string(),
            format!("{}/100", week.score),
        ]);
    }
    println!("{}", table);

    if !insights.triggers.is_empty() {
        println!();
        println!("{}", "Spending Triggers".bold());
        let mut table = output::create_table();
        table.set_header(vec!["Trigger", "Times", "Amount"]);
        for trigger in &insights.triggers {
            table.add_row(vec![
                trigger.trigger.to_string(),
                trigger.frequency.to_string(),
                output::money(trigger.amount, symbol),
            ]);
        }
        println!("{}", table);
    }

    Ok(())
}
