//! Spending analytics
//!
//! Pure aggregations over a transaction slice. Everything is scoped
//! relative to an explicit `today` so results are reproducible.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::{BudgetLimits, Category, Transaction};

/// Share of the monthly budget that triggers a warning
pub const BUDGET_WARNING_PERCENT: f64 = 80.0;

/// Months shown in the spending trend
pub const TREND_MONTHS: u32 = 6;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month `n` months before this one
    pub fn back(&self, n: u32) -> Self {
        (0..n).fold(*self, |key, _| key.previous())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Short English month name, e.g. `Mar`
    pub fn short_name(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b").to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Look-back window for range-scoped views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TimeRange {
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[default]
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "1year")]
    OneYear,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneMonth => "1month",
            TimeRange::ThreeMonths => "3months",
            TimeRange::SixMonths => "6months",
            TimeRange::OneYear => "1year",
        }
    }

    fn months(&self) -> u32 {
        match self {
            TimeRange::OneMonth => 1,
            TimeRange::ThreeMonths => 3,
            TimeRange::SixMonths => 6,
            TimeRange::OneYear => 12,
        }
    }

    /// First date inside the window
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1month" | "1m" | "month" => Ok(TimeRange::OneMonth),
            "3months" | "3m" => Ok(TimeRange::ThreeMonths),
            "6months" | "6m" => Ok(TimeRange::SixMonths),
            "1year" | "12months" | "1y" | "year" => Ok(TimeRange::OneYear),
            other => Err(format!("Unknown time range: {}", other)),
        }
    }
}

/// Transactions dated on or after the start of `range`
pub fn filter_range(txs: &[Transaction], range: TimeRange, today: NaiveDate) -> Vec<&Transaction> {
    let start = range.start(today);
    txs.iter().filter(|t| t.date >= start).collect()
}

/// Transactions dated within `month`
pub fn in_month(txs: &[Transaction], month: MonthKey) -> Vec<&Transaction> {
    txs.iter().filter(|t| month.contains(t.date)).collect()
}

/// Sum that saturates at `Decimal::MAX` instead of overflowing
pub(crate) fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `part * 100 / whole`, saturating; 0 when `whole` is not positive
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .or_else(|| {
            part.checked_div(whole)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        })
        .unwrap_or(if part.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

pub fn debit_total<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    sum_amounts(txs.into_iter().filter(|t| t.is_debit()).map(|t| t.amount))
}

pub fn credit_total<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    sum_amounts(txs.into_iter().filter(|t| t.is_credit()).map(|t| t.amount))
}

/// `part / whole` as a whole percentage, rounded half up; 0 when `whole` is 0
pub(crate) fn count_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// `part / whole * 100`; 0 when `whole` is not positive
pub(crate) fn amount_percent(part: Decimal, whole: Decimal) -> f64 {
    percent_of(part, whole).to_f64().unwrap_or(0.0)
}

/// Percentage of impulse debits among debits (rounded)
pub fn impulse_ratio<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> u32 {
    let (debits, impulse) = txs
        .into_iter()
        .filter(|t| t.is_debit())
        .fold((0usize, 0usize), |(d, i), t| (d + 1, i + usize::from(t.is_impulse)));
    count_percent(impulse, debits)
}

/// Month-over-month spending change in percent; 0 without previous spending
pub fn spending_change(current: Decimal, previous: Decimal) -> f64 {
    amount_percent(current - previous, previous)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAmount {
    pub category: Category,
    pub amount: Decimal,
}

/// Debit totals per category, largest first
pub fn category_breakdown<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Vec<CategoryAmount> {
    let mut totals: Vec<CategoryAmount> = Vec::new();
    for tx in txs.into_iter().filter(|t| t.is_debit()) {
        match totals.iter_mut().find(|c| c.category == tx.category) {
            Some(entry) => entry.amount = entry.amount.saturating_add(tx.amount),
            None => totals.push(CategoryAmount {
                category: tx.category.clone(),
                amount: tx.amount,
            }),
        }
    }
    // Stable: ties keep first-seen order
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));
    totals
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: MonthKey,
    pub label: String,
    pub spending: Decimal,
    pub income: Decimal,
}

/// Spending and income for the last `months` months, oldest first
pub fn monthly_trend(txs: &[Transaction], today: NaiveDate, months: u32) -> Vec<MonthlyPoint> {
    let current = MonthKey::of(today);
    (0..months)
        .rev()
        .map(|back| {
            let month = current.back(back);
            let scoped = in_month(txs, month);
            MonthlyPoint {
                month,
                label: month.short_name(),
                spending: debit_total(scoped.iter().copied()),
                income: credit_total(scoped.iter().copied()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayAmount {
    pub day: String,
    pub amount: Decimal,
}

/// Debit totals per weekday, Monday first
pub fn weekday_pattern<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Vec<WeekdayAmount> {
    const DAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    let mut totals = [Decimal::ZERO; 7];
    for tx in txs.into_iter().filter(|t| t.is_debit()) {
        let slot = &mut totals[tx.date.weekday().num_days_from_monday() as usize];
        *slot = slot.saturating_add(tx.amount);
    }
    DAYS.iter()
        .zip(totals)
        .map(|(day, amount)| WeekdayAmount {
            day: day.to_string(),
            amount,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpulseSplit {
    pub category: Category,
    pub impulse: Decimal,
    pub normal: Decimal,
}

/// Impulse and planned debit totals per category, in breakdown order
pub fn impulse_split(txs: &[&Transaction]) -> Vec<ImpulseSplit> {
    category_breakdown(txs.iter().copied())
        .into_iter()
        .map(|entry| {
            let (impulse, normal) = txs
                .iter()
                .filter(|t| t.is_debit() && t.category == entry.category)
                .fold((Decimal::ZERO, Decimal::ZERO), |(i, n), t| {
                    if t.is_impulse {
                        (i.saturating_add(t.amount), n)
                    } else {
                        (i, n.saturating_add(t.amount))
                    }
                });
            ImpulseSplit {
                category: entry.category,
                impulse,
                normal,
            }
        })
        .filter(|s| s.impulse > Decimal::ZERO || s.normal > Decimal::ZERO)
        .collect()
}

/// Analytics view model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub month: MonthKey,
    pub time_range: TimeRange,
    pub range_transaction_count: usize,
    pub current_month_spending: Decimal,
    pub previous_month_spending: Decimal,
    pub spending_change: f64,
    pub impulse_ratio: u32,
    pub top_category: Option<Category>,
    pub category_breakdown: Vec<CategoryAmount>,
    pub monthly_trend: Vec<MonthlyPoint>,
    pub weekday_pattern: Vec<WeekdayAmount>,
    pub impulse_split: Vec<ImpulseSplit>,
}

pub fn analytics_summary(txs: &[Transaction], range: TimeRange, today: NaiveDate) -> AnalyticsSummary {
    let month = MonthKey::of(today);
    let current = in_month(txs, month);
    let previous = in_month(txs, month.previous());

    let current_month_spending = debit_total(current.iter().copied());
    let previous_month_spending = debit_total(previous.iter().copied());
    let breakdown = category_breakdown(current.iter().copied());

    AnalyticsSummary {
        month,
        time_range: range,
        range_transaction_count: filter_range(txs, range, today).len(),
        current_month_spending,
        previous_month_spending,
        spending_change: spending_change(current_month_spending, previous_month_spending),
        impulse_ratio: impulse_ratio(current.iter().copied()),
        top_category: breakdown.first().map(|c| c.category.clone()),
        monthly_trend: monthly_trend(txs, today, TREND_MONTHS),
        weekday_pattern: weekday_pattern(current.iter().copied()),
        impulse_split: impulse_split(&current),
        category_breakdown: breakdown,
    }
}

/// Headline numbers for the current month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub month: MonthKey,
    pub transaction_count: usize,
    pub monthly_income: Decimal,
    pub monthly_spending: Decimal,
    pub monthly_income_actual: Decimal,
    pub impulse_score: u32,
    pub budget_limit: Decimal,
    pub budget_used_percentage: u32,
    pub remaining_budget: Decimal,
}

pub fn dashboard_summary(
    txs: &[Transaction],
    monthly_income: Decimal,
    budgets: &BudgetLimits,
    today: NaiveDate,
) -> DashboardSummary {
    let month = MonthKey::of(today);
    let current = in_month(txs, month);
    let spending = debit_total(current.iter().copied());

    let budget_used_percentage = if budgets.monthly > Decimal::ZERO {
        percent_of(spending, budgets.monthly)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(u32::MAX)
    } else {
        0
    };

    DashboardSummary {
        month,
        transaction_count: txs.len(),
        monthly_income,
        monthly_spending: spending,
        monthly_income_actual: credit_total(current.iter().copied()),
        impulse_score: impulse_ratio(current.iter().copied()),
        budget_limit: budgets.monthly,
        budget_used_percentage,
        remaining_budget: (budgets.monthly - spending).max(Decimal::ZERO),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Exceeded,
}

/// Raised when a new debit pushes monthly spending near or past the budget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    pub level: AlertLevel,
    pub category: String,
    pub current_amount: Decimal,
    pub budget_limit: Decimal,
    pub percentage: f64,
}

/// Check a new transaction against the monthly budget
///
/// `existing` is the ledger before the new transaction was added. Credits
/// and a zero budget never alert.
pub fn check_budget(
    existing: &[Transaction],
    new_tx: &Transaction,
    budgets: &BudgetLimits,
    today: NaiveDate,
) -> Option<BudgetAlert> {
    if new_tx.is_credit() || budgets.monthly <= Decimal::ZERO {
        return None;
    }

    let spending = debit_total(
        existing
            .iter()
            .filter(|t| t.id != new_tx.id && MonthKey::of(today).contains(t.date)),
    );
    let current_amount = spending.saturating_add(new_tx.amount);
    let percentage = amount_percent(current_amount, budgets.monthly);

    let level = if percentage >= 100.0 {
        AlertLevel::Exceeded
    } else if percentage >= BUDGET_WARNING_PERCENT {
        AlertLevel::Warning
    } else {
        return None;
    };

    Some(BudgetAlert {
        level,
        category: "Monthly Budget".to_string(),
        current_amount,
        budget_limit: budgets.monthly,
        percentage,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudgetUsage {
    pub category: String,
    pub spent: Decimal,
    pub limit: Decimal,
    pub percentage: f64,
}

/// Current-month spending against each configured category limit
pub fn category_budget_usage(
    txs: &[Transaction],
    budgets: &BudgetLimits,
    today: NaiveDate,
) -> Vec<CategoryBudgetUsage> {
    let current = in_month(txs, MonthKey::of(today));
    budgets
        .categories
        .iter()
        .filter(|(_, limit)| **limit > Decimal::ZERO)
        .map(|(label, limit)| {
            let spent = debit_total(
                current
                    .iter()
                    .copied()
                    .filter(|t| t.category.label() == label.as_str()),
            );
            CategoryBudgetUsage {
                category: label.clone(),
                spent,
                limit: *limit,
                percentage: amount_percent(spent, *limit),
            }
        })
        .collect()
}
