//! Spendwise CLI - statement import and spending insights in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    add, analytics, delete, edit, export, import, insights, journal, list, reset, settings, status,
};
use spendwise_core::services::{BulkPeriod, SortField, SortOrder, TimeRange};
use spendwise_core::{Category, Mood, TransactionType};

/// Spendwise - statement import and spending insights in your terminal
#[derive(Parser)]
#[command(name = "sw", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import bank statements (CSV, Excel, text or PDF)
    Import {
        /// Statement files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Preview without saving
        #[arg(long)]
        preview: bool,
        /// Also save placeholder records generated for unreadable files
        #[arg(long)]
        keep_placeholder: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a transaction by hand
    Add {
        /// Amount (positive)
        amount: String,
        /// What the money was for
        description: String,
        /// credit or debit
        #[arg(long = "type", default_value = "debit")]
        kind: TransactionType,
        /// Category label (detected from the description if omitted)
        #[arg(long)]
        category: Option<Category>,
        /// Date (YYYY-MM-DD or DD/MM/YYYY; defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Mood at the time of purchase
        #[arg(long)]
        mood: Option<Mood>,
        /// Flag as an impulse purchase
        #[arg(long)]
        impulse: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit an existing transaction
    Edit {
        /// Transaction ID
        id: String,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, conflicts_with = "clear_mood")]
        mood: Option<Mood>,
        /// Remove the recorded mood
        #[arg(long)]
        clear_mood: bool,
        /// Set or clear the impulse flag
        #[arg(long)]
        impulse: Option<bool>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Delete every transaction in the current week or month
    BulkDelete {
        /// week or month
        #[arg(long)]
        period: BulkPeriod,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// List transactions with running totals
    List {
        /// Match description, category or mood
        #[arg(long, short)]
        search: Option<String>,
        /// credit or debit
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        #[arg(long)]
        category: Option<String>,
        /// date, amount, description or category
        #[arg(long, default_value = "date")]
        sort: SortField,
        /// asc or desc
        #[arg(long, default_value = "desc")]
        order: SortOrder,
        /// Show at most this many rows
        #[arg(long, short = 'n')]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show this month's dashboard
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Spending analytics
    Analytics {
        /// 1month, 3months, 6months or 1year
        #[arg(long, default_value = "6months")]
        range: TimeRange,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Behavioral insights (impulse score, moods, triggers)
    Insights {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export history, analytics or all data
    Export {
        #[command(subcommand)]
        command: export::ExportCommands,
    },

    /// Manage income, budgets, notifications and import settings
    Settings {
        #[command(subcommand)]
        command: settings::SettingsCommands,
    },

    /// Save a weekly reflection
    Reflect {
        /// Reflection text
        text: Option<String>,
        /// List saved reflections
        #[arg(long)]
        list: bool,
    },

    /// Set, list or complete weekly goals
    Goal {
        /// Goal text
        text: Option<String>,
        /// Mark a goal as completed
        #[arg(long, value_name = "ID")]
        complete: Option<String>,
    },

    /// Delete all data
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("SPENDWISE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Import { files, preview, keep_placeholder, json } => {
            import::run(&files, preview, keep_placeholder, json)
        }
        Commands::Add { amount, description, kind, category, date, mood, impulse, json } => {
            add::run(add::AddArgs {
                amount,
                description,
                kind,
                category,
                date,
                mood,
                impulse,
                json,
            })
        }
        Commands::Edit { id, amount, description, kind, category, date, mood, clear_mood, impulse } => {
            edit::run(
                &id,
                edit::EditArgs {
                    amount,
                    description,
                    kind,
                    category,
                    date,
                    mood,
                    clear_mood,
                    impulse,
                },
            )
        }
        Commands::Delete { id, force } => delete::run(&id, force),
        Commands::BulkDelete { period, force } => delete::run_bulk(period, force),
        Commands::List { search, kind, category, sort, order, limit, json } => {
            list::run(search, kind, category, sort, order, limit, json)
        }
        Commands::Status { json } => status::run(json),
        Commands::Analytics { range, json } => analytics::run(range, json),
        Commands::Insights { json } => insights::run(json),
        Commands::Export { command } => export::run(command),
        Commands::Settings { command } => settings::run(command),
        Commands::Reflect { text, list } => journal::run_reflect(text, list),
        Commands::Goal { text, complete } => journal::run_goal(text, complete),
        Commands::Reset { force } => reset::run(force),
    }
}
