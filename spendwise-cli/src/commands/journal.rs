//! Reflection and goal commands

use anyhow::{bail, Result};
use colored::Colorize;

use super::{get_context, truncate};
use crate::output;
use spendwise_core::domain::GoalStatus;

pub fn run_reflect(text: Option<String>, list: bool) -> Result<()> {
    let ctx = get_context()?;

    if let Some(text) = text {
        let reflection = ctx.settings.add_reflection(&text)?;
        output::success(&format!("Reflection saved ({})", truncate(&reflection.id, 8)));
        return Ok(());
    }

    if !list {
        bail!("Pass reflection text, or --list to see saved reflections");
    }

    let mut reflections = ctx.settings.reflections()?;
    if reflections.is_empty() {
        output::info("No reflections yet");
        return Ok(());
    }

    reflections.sort_by(|a, b| b.date.cmp(&a.date));
    for reflection in &reflections {
        println!(
            "{}  {}",
            reflection.date.format("%Y-%m-%d").to_string().dimmed(),
            reflection.content
        );
    }

    Ok(())
}

pub fn run_goal(text: Option<String>, complete: Option<String>) -> Result<()> {
    let ctx = get_context()?;

    if let Some(id) = complete {
        // Accept an unambiguous id prefix as shown in the list
        let goals = ctx.settings.goals()?;
        let matches: Vec<_> = goals.iter().filter(|g| g.id.starts_with(&id)).collect();
        let goal = match matches.as_slice() {
            [goal] => *goal,
            [] => bail!("No goal matching '{}'", id),
            _ => bail!("'{}' matches {} goals, use a longer id", id, matches.len()),
        };
        let done = ctx.settings.complete_goal(&goal.id)?;
        output::success(&format!("Goal completed: {}", done.content));
        return Ok(());
    }

    if let Some(text) = text {
        let goal = ctx.settings.add_goal(&text)?;
        output::success(&format!("Goal set ({})", truncate(&goal.id, 8)));
        return Ok(());
    }

    let goals = ctx.settings.goals()?;
    if goals.is_empty() {
        output::info("No goals yet. Try `sw goal \"No takeout this week\"`");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Set", "Goal", "Status"]);
    for goal in &goals {
        let status = match goal.status {
            GoalStatus::Active => "active".yellow().to_string(),
            GoalStatus::Completed => "completed".green().to_string(),
        };
        table.add_row(vec![
            truncate(&goal.id, 8),
            goal.date.format("%Y-%m-%d").to_string(),
            goal.content.clone(),
            status,
        ]);
    }
    println!("{}", table);

    Ok(())
}
