//! Transaction domain model

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::mood::Mood;
use super::result::{Error, Result};

/// Longest description accepted from manual entry or imports
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Largest amount accepted from manual entry or imports (10^15)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Direction of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received (income, refund, ...)
    Credit,
    /// Money spent
    Debit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
        }
    }

    /// Capitalized label used in exports
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Credit => "Credit",
            TransactionType::Debit => "Debit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" | "cr" => Ok(TransactionType::Credit),
            "debit" | "dr" => Ok(TransactionType::Debit),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// A single income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque unique identifier, never reused
    pub id: String,
    pub date: NaiveDate,
    /// Non-negative magnitude; direction lives in `kind`
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
    pub description: String,
    /// Only meaningful for debits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    /// Only meaningful for debits
    #[serde(default)]
    pub is_impulse: bool,
}

impl Transaction {
    /// Create a new transaction with a freshly generated id
    pub fn new(
        date: NaiveDate,
        amount: Decimal,
        kind: TransactionType,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            amount,
            kind,
            category,
            description: description.into(),
            mood: None,
            is_impulse: false,
        }
    }

    pub fn with_mood(mut self, mood: Option<Mood>) -> Self {
        self.mood = mood;
        self
    }

    pub fn with_impulse(mut self, is_impulse: bool) -> Self {
        self.is_impulse = is_impulse;
        self
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionType::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.kind == TransactionType::Debit
    }

    /// Debit flagged as impulse
    pub fn is_impulse_debit(&self) -> bool {
        self.is_debit() && self.is_impulse
    }

    /// Enforce writer invariants
    ///
    /// Credits never carry mood or impulse, amounts are magnitudes, and
    /// descriptions are trimmed and capped at `MAX_DESCRIPTION_LEN` characters.
    pub fn normalized(mut self) -> Self {
        if self.is_credit() {
            self.is_impulse = false;
            self.mood = None;
        }
        self.amount = self.amount.abs();
        self.description = truncate_description(self.description.trim());
        self
    }

    /// Validate fields a user must supply
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::validation("Transaction id must not be empty"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::validation("Please enter a valid amount"));
        }
        if self.amount > MAX_AMOUNT {
            return Err(Error::validation(format!("Amount exceeds {}", MAX_AMOUNT)));
        }
        if self.description.trim().is_empty() {
            return Err(Error::validation("Please enter a description"));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(Error::validation(format!(
                "Description exceeds {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        if self.category.label().trim().is_empty() {
            return Err(Error::validation("Please select a category"));
        }
        Ok(())
    }
}

/// Cap a description at `MAX_DESCRIPTION_LEN` characters
pub fn truncate_description(desc: &str) -> String {
    desc.chars().take(MAX_DESCRIPTION_LEN).collect()
}
