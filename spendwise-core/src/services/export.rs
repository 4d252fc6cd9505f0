//! Exports - history CSV, analytics report and full data dump

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::analytics::{analytics_summary, TimeRange};
use super::history::HistoryRow;
use crate::domain::result::{Error, Result};
use crate::domain::{
    BudgetLimits, Category, Goal, NotificationPreferences, Reflection, Transaction,
};

pub const HISTORY_HEADERS: [&str; 9] = [
    "S.No",
    "Transaction",
    "Date",
    "Amount Debit",
    "Current Amount Left",
    "% Spent",
    "Type",
    "Impulse Spent",
    "Mood",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    History,
    Report,
    Data,
}

impl ExportKind {
    /// Default file name for an export produced on `date`
    pub fn file_name(&self, date: NaiveDate) -> String {
        let (stem, ext) = match self {
            ExportKind::History => ("transactions", "csv"),
            ExportKind::Report => ("analytics", "json"),
            ExportKind::Data => ("data", "json"),
        };
        format!("spendwise-{}-{}.{}", stem, date.format("%Y-%m-%d"), ext)
    }
}

/// Render history rows as CSV
///
/// Debit-only columns are left empty for credits.
pub fn history_csv(rows: &[HistoryRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HISTORY_HEADERS)?;

    for row in rows {
        let tx = &row.transaction;
        let (debit, left, spent) = if tx.is_debit() {
            (
                tx.amount.to_string(),
                row.amount_left.to_string(),
                format!(
                    "{:.1}%",
                    row.percentage_spent
                        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
                ),
            )
        } else {
            (String::new(), String::new(), String::new())
        };

        writer.write_record([
            row.serial.to_string(),
            tx.description.clone(),
            tx.date.format("%Y-%m-%d").to_string(),
            debit,
            left,
            spent,
            tx.kind.label().to_string(),
            if tx.is_impulse { "Yes" } else { "No" }.to_string(),
            tx.mood
                .map(|m| m.label().to_string())
                .unwrap_or_else(|| "Not tracked".to_string()),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_transactions: usize,
    pub current_month_spending: Decimal,
    pub spending_change: f64,
    pub impulse_ratio: u32,
    pub top_category: Option<Category>,
}

/// Analytics report written by `export report`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub report_date: DateTime<Utc>,
    pub time_range: TimeRange,
    pub summary: ReportSummary,
    pub transactions: Vec<Transaction>,
}

impl AnalyticsReport {
    pub fn build(
        txs: &[Transaction],
        range: TimeRange,
        today: NaiveDate,
        report_date: DateTime<Utc>,
    ) -> Self {
        let summary = analytics_summary(txs, range, today);
        Self {
            report_date,
            time_range: range,
            summary: ReportSummary {
                total_transactions: txs.len(),
                current_month_spending: summary.current_month_spending,
                spending_change: summary.spending_change,
                impulse_ratio: summary.impulse_ratio,
                top_category: summary.top_category,
            },
            transactions: txs.to_vec(),
        }
    }
}

/// Everything persisted, as written by `export data`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExport {
    pub transactions: Vec<Transaction>,
    pub income: Decimal,
    pub budgets: BudgetLimits,
    pub notifications: NotificationPreferences,
    pub reflections: Vec<Reflection>,
    pub goals: Vec<Goal>,
    pub export_date: DateTime<Utc>,
}

/// Pretty-printed JSON for report and data exports
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
