//! Export commands - history CSV, analytics report, full data dump

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use super::{get_context, today};
use crate::output;
use spendwise_core::services::export::to_pretty_json;
use spendwise_core::services::{ExportKind, HistoryQuery, SortField, SortOrder, TimeRange};
use spendwise_core::TransactionType;

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Transaction history with running totals as CSV
    History {
        /// Output file (defaults to spendwise-transactions-<date>.csv)
        #[arg(long, short)]
        out: Option<PathBuf>,
        /// Only rows matching this text
        #[arg(long)]
        search: Option<String>,
        /// Only credit or debit rows
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        /// Only rows in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Analytics report as JSON
    Report {
        /// 1month, 3months, 6months or 1year
        #[arg(long, default_value = "6months")]
        range: TimeRange,
        /// Output file (defaults to spendwise-analytics-<date>.json)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Every stored record as JSON
    Data {
        /// Output file (defaults to spendwise-data-<date>.json)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

pub fn run(command: ExportCommands) -> Result<()> {
    let ctx = get_context()?;
    let today = today();

    let (kind, out, content) = match command {
        ExportCommands::History {
            out,
            search,
            kind,
            category,
        } => {
            // Oldest first so the running totals read top to bottom
            let query = HistoryQuery {
                search,
                kind,
                category,
                sort: SortField::Date,
                order: SortOrder::Asc,
            };
            let csv = ctx.report_service.history_csv(&query)?;
            (ExportKind::History, out, csv)
        }
        ExportCommands::Report { range, out } => {
            let report = ctx.report_service.analytics_report(range, today)?;
            (ExportKind::Report, out, to_pretty_json(&report)?)
        }
        ExportCommands::Data { out } => {
            let data = ctx.report_service.data_export()?;
            (ExportKind::Data, out, to_pretty_json(&data)?)
        }
    };

    let path = out.unwrap_or_else(|| PathBuf::from(kind.file_name(today)));
    write_export(&path, &content)?;
    output::success(&format!("Exported to {}", path.display()));

    Ok(())
}

fn write_export(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote export");
    Ok(())
}
