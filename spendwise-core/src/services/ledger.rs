//! Ledger service - the transaction collection
//!
//! Newest entries come first. Order only affects history display; every
//! aggregate is order-independent.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::state::{StateKey, StateService};
use crate::domain::result::{Error, Result};
use crate::domain::Transaction;

/// Span offered for bulk deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkPeriod {
    /// Sunday through Saturday of the current week
    Week,
    /// Current calendar month
    Month,
}

impl BulkPeriod {
    /// Inclusive date range containing `today`
    pub fn range(&self, today: NaiveDate) -> DateRange {
        match self {
            BulkPeriod::Week => {
                let start =
                    today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
                DateRange {
                    start,
                    end: start + Duration::days(6),
                }
            }
            BulkPeriod::Month => {
                let start = today.with_day(1).unwrap_or(today);
                DateRange {
                    start,
                    end: last_day_of_month(start),
                }
            }
        }
    }
}

impl std::str::FromStr for BulkPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(BulkPeriod::Week),
            "month" => Ok(BulkPeriod::Month),
            other => Err(format!("Unknown period: {}", other)),
        }
    }
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

pub(crate) fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Transactions a bulk delete would remove
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeletePlan {
    pub period: BulkPeriod,
    pub range: DateRange,
    pub candidates: Vec<Transaction>,
}

impl BulkDeletePlan {
    pub fn ids(&self) -> Vec<String> {
        self.candidates.iter().map(|t| t.id.clone()).collect()
    }
}

/// Ledger service for the transaction collection
pub struct LedgerService {
    state: Arc<StateService>,
}

impl LedgerService {
    pub fn new(state: Arc<StateService>) -> Self {
        Self { state }
    }

    /// All transactions, newest entries first
    pub fn list(&self) -> Result<Vec<Transaction>> {
        self.state.get_or_default(StateKey::Transactions)
    }

    pub fn get(&self, id: &str) -> Result<Transaction> {
        self.list()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::not_found(format!("Transaction {}", id)))
    }

    /// Record a single transaction
    pub fn add(&self, transaction: Transaction) -> Result<Transaction> {
        let transaction = transaction.normalized();
        transaction.validate()?;

        let mut all = self.list()?;
        if all.iter().any(|t| t.id == transaction.id) {
            return Err(Error::validation(format!(
                "Duplicate transaction id: {}",
                transaction.id
            )));
        }
        all.insert(0, transaction.clone());
        self.save(&all)?;
        Ok(transaction)
    }

    /// Record a batch (e.g. one imported file) ahead of existing entries
    ///
    /// The batch is rejected as a whole if any record is invalid or reuses an id.
    pub fn add_many(&self, transactions: Vec<Transaction>) -> Result<usize> {
        if transactions.is_empty() {
            return Ok(0);
        }

        let mut all = self.list()?;
        let mut seen: HashSet<String> = all.iter().map(|t| t.id.clone()).collect();

        let mut batch = Vec::with_capacity(transactions.len() + all.len());
        for tx in transactions {
            let tx = tx.normalized();
            tx.validate()?;
            if !seen.insert(tx.id.clone()) {
                return Err(Error::validation(format!("Duplicate transaction id: {}", tx.id)));
            }
            batch.push(tx);
        }

        let added = batch.len();
        batch.append(&mut all);
        self.save(&batch)?;
        tracing::debug!(added, "Appended transaction batch");
        Ok(added)
    }

    /// Replace the transaction with the same id, keeping its position
    pub fn update(&self, transaction: Transaction) -> Result<Transaction> {
        let transaction = transaction.normalized();
        transaction.validate()?;

        let mut all = self.list()?;
        let slot = all
            .iter_mut()
            .find(|t| t.id == transaction.id)
            .ok_or_else(|| Error::not_found(format!("Transaction {}", transaction.id)))?;
        *slot = transaction.clone();
        self.save(&all)?;
        Ok(transaction)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let mut all = self.list()?;
        let before = all.len();
        all.retain(|t| t.id != id);
        if all.len() == before {
            return Err(Error::not_found(format!("Transaction {}", id)));
        }
        self.save(&all)
    }

    /// Delete every listed id; unknown ids are ignored
    pub fn bulk_delete(&self, ids: &[String]) -> Result<usize> {
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut all = self.list()?;
        let before = all.len();
        all.retain(|t| !ids.contains(t.id.as_str()));
        let removed = before - all.len();
        if removed > 0 {
            self.save(&all)?;
        }
        Ok(removed)
    }

    /// Transactions dated within the current week or month
    pub fn bulk_delete_candidates(&self, period: BulkPeriod, today: NaiveDate) -> Result<BulkDeletePlan> {
        let range = period.range(today);
        let candidates = self
            .list()?
            .into_iter()
            .filter(|t| range.contains(t.date))
            .collect();
        Ok(BulkDeletePlan {
            period,
            range,
            candidates,
        })
    }

    /// Remove every transaction
    pub fn clear(&self) -> Result<()> {
        self.state.remove(StateKey::Transactions)
    }

    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        self.state.set(StateKey::Transactions, &transactions)
    }
}
