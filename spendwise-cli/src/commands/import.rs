//! Import command - import bank statements

use std::path::PathBuf;

use anyhow::{bail, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use super::{currency, get_context, truncate};
use crate::output;
use spendwise_core::services::{
    BatchImport, FileImport, FileStatus, ImportOrigin, LedgerService,
};

/// Rows shown per file in preview mode
const PREVIEW_ROWS: usize = 10;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportReport<'a> {
    preview: bool,
    saved: usize,
    save_errors: &'a [SaveError],
    #[serde(flatten)]
    batch: &'a BatchImport,
}

/// A parsed file whose records could not be written to the ledger
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveError {
    file_name: String,
    error: String,
}

#[derive(Debug, Default)]
struct SaveSummary {
    saved: usize,
    errors: Vec<SaveError>,
}

/// Append each completed file to the ledger, one write per file
///
/// A file that fails to save is recorded and the remaining files are still
/// attempted. Placeholder files are only saved with `keep_placeholder`.
fn save_batch(ledger: &LedgerService, batch: &BatchImport, keep_placeholder: bool) -> SaveSummary {
    let mut summary = SaveSummary::default();
    for file in batch.completed() {
        if file.origin.is_placeholder() && !keep_placeholder {
            continue;
        }
        match ledger.add_many(file.transactions.clone()) {
            Ok(added) => summary.saved += added,
            Err(e) => {
                tracing::warn!(file = %file.file_name, error = %e, "Failed to save imported file");
                summary.errors.push(SaveError {
                    file_name: file.file_name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    summary
}

pub fn run(files: &[PathBuf], preview: bool, keep_placeholder: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let symbol = currency(&ctx.config);

    let progress = if json || files.len() < 2 {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")?
                .progress_chars("=> "),
        );
        bar
    };

    let batch = ctx.import_service.import_batch(files, |status| {
        progress.set_message(status.file_name().to_string());
        progress.inc(1);
    });
    progress.finish_and_clear();

    let summary = if preview {
        SaveSummary::default()
    } else {
        save_batch(&ctx.ledger, &batch, keep_placeholder)
    };
    let saved = summary.saved;

    if json {
        let report = ImportReport {
            preview,
            saved,
            save_errors: &summary.errors,
            batch: &batch,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return save_result(&summary);
    }

    if !batch.unsupported.is_empty() {
        output::warning(&format!(
            "Skipped {} unsupported file(s): {}",
            batch.unsupported.len(),
            batch.unsupported.join(", ")
        ));
        println!(
            "{}",
            "Supported formats: CSV, Excel (.xlsx), text and PDF".dimmed()
        );
        println!();
    }

    if preview {
        println!("{}", "PREVIEW MODE - No changes applied".yellow());
        println!();
    }

    let mut table = output::create_table();
    table.set_header(vec!["File", "Result", "Records", "Skipped rows", "Estimated dates"]);
    for status in &batch.files {
        match status {
            FileStatus::Completed(file) => {
                table.add_row(vec![
                    file.file_name.clone(),
                    origin_label(&file.origin),
                    file.transactions.len().to_string(),
                    file.skipped_rows.to_string(),
                    file.estimated_dates.to_string(),
                ]);
            }
            FileStatus::Failed { file_name, error } => {
                table.add_row(vec![
                    file_name.clone(),
                    format!("failed: {}", error),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ]);
            }
        }
    }
    println!("{}", table);

    for file in batch.completed() {
        match file.origin {
            ImportOrigin::Placeholder { .. } => {
                output::warning(&format!(
                    "Could not parse {}; generated {} placeholder records (not your data).",
                    file.file_name,
                    file.transactions.len()
                ));
                if !preview && !keep_placeholder {
                    println!(
                        "{}",
                        "Placeholder records were not saved. Pass --keep-placeholder to save them."
                            .dimmed()
                    );
                }
            }
            ImportOrigin::Empty => {
                output::warning(&format!("No transactions found in {}", file.file_name));
            }
            ImportOrigin::Parsed => {}
        }
        if file.estimated_dates > 0 {
            output::warning(&format!(
                "{}: {} row(s) had unreadable dates and were given estimated ones",
                file.file_name, file.estimated_dates
            ));
        }
        if preview {
            print_preview(file, symbol);
        }
    }

    println!();
    if preview {
        let total: usize = batch.completed().map(|f| f.transactions.len()).sum();
        output::info(&format!("{} transaction(s) would be imported", total));
    } else if saved > 0 {
        output::success(&format!(
            "Imported {} transaction(s) from {} file(s)",
            saved,
            batch.completed().count() - summary.errors.len()
        ));
    } else {
        output::warning("No transactions imported");
    }
    if batch.failed_count() > 0 {
        output::error(&format!("{} file(s) failed to import", batch.failed_count()));
    }
    for failure in &summary.errors {
        output::error(&format!("{} was not saved: {}", failure.file_name, failure.error));
    }

    save_result(&summary)
}

fn save_result(summary: &SaveSummary) -> Result<()> {
    if !summary.errors.is_empty() {
        bail!(
            "{} file(s) could not be saved ({} transaction(s) were saved)",
            summary.errors.len(),
            summary.saved
        );
    }
    Ok(())
}

fn origin_label(origin: &ImportOrigin) -> String {
    match origin {
        ImportOrigin::Parsed => "parsed".to_string(),
        ImportOrigin::Placeholder { .. } => "placeholder".to_string(),
        ImportOrigin::Empty => "empty".to_string(),
    }
}

fn print_preview(file: &FileImport, symbol: &str) {
    if file.transactions.is_empty() {
        return;
    }
    println!();
    println!("{}", file.file_name.bold());

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Description", "Category", "Type", "Amount"]);
    for tx in file.transactions.iter().take(PREVIEW_ROWS) {
        table.add_row(vec![
            tx.date.to_string(),
            truncate(&tx.description, 40),
            tx.category.to_string(),
            tx.kind.label().to_string(),
            output::money(tx.amount, symbol),
        ]);
    }
    println!("{}", table);
    if file.transactions.len() > PREVIEW_ROWS {
        println!(
            "{}",
            format!("... and {} more", file.transactions.len() - PREVIEW_ROWS).dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use spendwise_core::adapters::MemoryStore;
    use spendwise_core::services::import::{FileKind, PlaceholderReason};
    use spendwise_core::services::StateService;
    use spendwise_core::{Category, Transaction, TransactionType};
    use std::sync::Arc;

    fn ledger() -> LedgerService {
        LedgerService::new(Arc::new(StateService::new(Arc::new(MemoryStore::new()))))
    }

    fn debit(amount: i64, description: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            Decimal::new(amount, 0),
            TransactionType::Debit,
            Category::Shopping,
            description,
        )
    }

    fn completed(name: &str, origin: ImportOrigin, transactions: Vec<Transaction>) -> FileStatus {
        FileStatus::Completed(FileImport {
            file_name: name.to_string(),
            byte_len: 0,
            kind: FileKind::Csv,
            origin,
            transactions,
            skipped_rows: 0,
            estimated_dates: 0,
        })
    }

    #[test]
    fn test_save_batch_continues_past_a_failed_file() {
        let ledger = ledger();
        let batch = BatchImport {
            unsupported: vec![],
            files: vec![
                completed("march.csv", ImportOrigin::Parsed, vec![debit(120, "Groceries")]),
                completed("broken.csv", ImportOrigin::Parsed, vec![debit(0, "Zero amount")]),
                completed(
                    "april.csv",
                    ImportOrigin::Parsed,
                    vec![debit(80, "Taxi"), debit(45, "Coffee")],
                ),
            ],
        };

        let summary = save_batch(&ledger, &batch, false);

        assert_eq!(summary.saved, 3);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].file_name, "broken.csv");
        assert_eq!(ledger.list().unwrap().len(), 3);
        assert!(save_result(&summary).is_err());
    }

    #[test]
    fn test_save_batch_skips_placeholder_unless_kept() {
        let placeholder = || ImportOrigin::Placeholder {
            reason: PlaceholderReason::NotDelimitedText,
        };
        let batch = BatchImport {
            unsupported: vec![],
            files: vec![completed("scan.pdf", placeholder(), vec![debit(300, "Sample")])],
        };

        let ledger = ledger();
        let summary = save_batch(&ledger, &batch, false);
        assert_eq!(summary.saved, 0);
        assert!(ledger.list().unwrap().is_empty());
        assert!(save_result(&summary).is_ok());

        let summary = save_batch(&ledger, &batch, true);
        assert_eq!(summary.saved, 1);
    }
}
