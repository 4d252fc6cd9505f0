//! Transaction history with running totals

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use super::analytics::percent_of;
use crate::domain::settings::FALLBACK_BASE_AMOUNT;
use crate::domain::{Transaction, TransactionType};

/// A transaction annotated with its position in the running debit total
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub serial: usize,
    #[serde(flatten)]
    pub transaction: Transaction,
    pub running_debit_total: Decimal,
    pub amount_left: Decimal,
    /// Capped at 100
    pub percentage_spent: Decimal,
}

/// Amount the running total is measured against
pub fn base_amount(monthly_income: Decimal, monthly_budget: Decimal) -> Decimal {
    if monthly_income > Decimal::ZERO {
        monthly_income
    } else if monthly_budget > Decimal::ZERO {
        monthly_budget
    } else {
        FALLBACK_BASE_AMOUNT
    }
}

/// Number rows oldest first and accumulate debits against `base`
pub fn history_rows(txs: &[Transaction], base: Decimal) -> Vec<HistoryRow> {
    let mut sorted: Vec<&Transaction> = txs.iter().collect();
    sorted.sort_by_key(|t| t.date);

    let mut running = Decimal::ZERO;
    sorted
        .into_iter()
        .enumerate()
        .map(|(idx, tx)| {
            if tx.is_debit() {
                running = running.saturating_add(tx.amount);
            }
            let percentage_spent = percent_of(running, base).min(Decimal::ONE_HUNDRED);
            HistoryRow {
                serial: idx + 1,
                transaction: tx.clone(),
                running_debit_total: running,
                amount_left: (base - running).max(Decimal::ZERO),
                percentage_spent,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Description,
    Category,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(SortField::Date),
            "amount" => Ok(SortField::Amount),
            "description" => Ok(SortField::Description),
            "category" => Ok(SortField::Category),
            other => Err(format!("Unknown sort field: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// Search, filter and sort options for the history view
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// Case-insensitive match on description, category or mood
    pub search: Option<String>,
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub sort: SortField,
    pub order: SortOrder,
}

impl HistoryQuery {
    fn matches(&self, tx: &Transaction) -> bool {
        if let Some(term) = self.search.as_deref().map(str::to_lowercase) {
            let hit = tx.description.to_lowercase().contains(&term)
                || tx.category.label().to_lowercase().contains(&term)
                || tx.mood.is_some_and(|m| m.label().to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        if self.kind.is_some_and(|k| k != tx.kind) {
            return false;
        }
        if let Some(category) = &self.category {
            if !tx.category.label().eq_ignore_ascii_case(category) {
                return false;
            }
        }
        true
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ordering = match self.sort {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.cmp(&b.amount),
            SortField::Description => a.description.to_lowercase().cmp(&b.description.to_lowercase()),
            SortField::Category => a
                .category
                .label()
                .to_lowercase()
                .cmp(&b.category.label().to_lowercase()),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Apply the query; serial numbers and running totals are left untouched
    pub fn apply(&self, rows: Vec<HistoryRow>) -> Vec<HistoryRow> {
        let mut rows: Vec<HistoryRow> = rows
            .into_iter()
            .filter(|row| self.matches(&row.transaction))
            .collect();
        rows.sort_by(|a, b| self.compare(&a.transaction, &b.transaction));
        rows
    }
}
