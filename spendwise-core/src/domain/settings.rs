//! User settings blobs
//!
//! Simple key-value configuration records persisted next to the ledger.
//! None of these carry cross-record invariants.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;

/// Monthly income assumed until the user sets one
pub const DEFAULT_MONTHLY_INCOME: Decimal = Decimal::from_parts(50000, 0, 0, false, 0);

/// Base amount for running totals when neither income nor budget is set
pub const FALLBACK_BASE_AMOUNT: Decimal = Decimal::from_parts(50000, 0, 0, false, 0);

/// Monthly and per-category spending limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLimits {
    pub monthly: Decimal,
    #[serde(default)]
    pub categories: BTreeMap<String, Decimal>,
}

impl BudgetLimits {
    /// Limit configured for a category, if any
    pub fn for_category(&self, category: &Category) -> Option<Decimal> {
        self.categories
            .get(category.label())
            .copied()
            .filter(|limit| *limit > Decimal::ZERO)
    }
}

impl Default for BudgetLimits {
    fn default() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(Category::FoodAndDining.label().to_string(), Decimal::new(15000, 0));
        categories.insert(Category::Shopping.label().to_string(), Decimal::new(10000, 0));
        categories.insert(Category::TravelAndTransport.label().to_string(), Decimal::new(8000, 0));
        categories.insert(Category::Entertainment.label().to_string(), Decimal::new(5000, 0));
        categories.insert(Category::BillsAndUtilities.label().to_string(), Decimal::new(7000, 0));
        Self {
            monthly: Decimal::new(45000, 0),
            categories,
        }
    }
}

/// Which alerts the user wants to see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub spending: bool,
    pub budget: bool,
    pub weekly: bool,
    pub impulse: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            spending: true,
            budget: true,
            weekly: false,
            impulse: true,
        }
    }
}

/// Free-text weekly reflection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    pub id: String,
    pub date: DateTime<Utc>,
    pub content: String,
}

impl Reflection {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
}

/// Weekly spending goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub status: GoalStatus,
}

impl Goal {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            content: content.into(),
            status: GoalStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budgets() {
        let limits = BudgetLimits::default();
        assert_eq!(limits.monthly, Decimal::new(45000, 0));
        assert_eq!(
            limits.for_category(&Category::FoodAndDining),
            Some(Decimal::new(15000, 0))
        );
        assert_eq!(limits.for_category(&Category::Healthcare), None);
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_MONTHLY_INCOME, Decimal::new(50000, 0));
        assert_eq!(FALLBACK_BASE_AMOUNT, Decimal::new(50000, 0));
    }

    #[test]
    fn test_goal_starts_active() {
        let goal = Goal::new("No takeout this week");
        assert_eq!(goal.status, GoalStatus::Active);
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["status"], "active");
    }
}
