//! Behavioral insights - impulse control, mood spending and triggers

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::analytics::{amount_percent, count_percent, in_month, sum_amounts, MonthKey};
use crate::domain::{Category, Mood, Transaction};

/// Weeks covered by the impulse score trend
pub const TREND_WEEKS: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlLevel {
    Excellent,
    Moderate,
    NeedsAttention,
}

impl ControlLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=30 => ControlLevel::Excellent,
            31..=60 => ControlLevel::Moderate,
            _ => ControlLevel::NeedsAttention,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ControlLevel::Excellent => "Excellent Control",
            ControlLevel::Moderate => "Moderate Control",
            ControlLevel::NeedsAttention => "Needs Attention",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            0..=30 => RiskLevel::Low,
            31..=60 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodSpending {
    pub mood: Mood,
    pub amount: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyScore {
    pub week: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerStat {
    pub trigger: &'static str,
    pub frequency: usize,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoalProgress {
    pub spent: Decimal,
    pub limit: Decimal,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralInsights {
    pub impulse_score: u32,
    pub control: ControlLevel,
    pub emotional_percentage: u32,
    pub emotional_risk: RiskLevel,
    pub mood_spending: Vec<MoodSpending>,
    pub weekly_trend: Vec<WeeklyScore>,
    pub triggers: Vec<TriggerStat>,
    pub weekly_goal: WeeklyGoalProgress,
}

impl BehavioralInsights {
    /// Nothing to analyze until some debit carries a mood or impulse flag
    pub fn has_data(&self) -> bool {
        !self.mood_spending.is_empty() || self.impulse_score > 0
    }
}

enum TriggerRule {
    ImpulseIn(Category),
    Moods(&'static [Mood]),
}

static TRIGGERS: [(&str, TriggerRule); 5] = [
    ("Social Media Ads", TriggerRule::ImpulseIn(Category::Shopping)),
    ("Stress/Work", TriggerRule::Moods(&[Mood::Stressed, Mood::Anxious])),
    ("Social Events", TriggerRule::ImpulseIn(Category::Entertainment)),
    ("Boredom", TriggerRule::Moods(&[Mood::Bored])),
    ("Sales/Discounts", TriggerRule::ImpulseIn(Category::Shopping)),
];

impl TriggerRule {
    fn matches(&self, tx: &Transaction) -> bool {
        match self {
            TriggerRule::ImpulseIn(category) => tx.is_impulse && tx.category == *category,
            TriggerRule::Moods(moods) => tx.mood.is_some_and(|m| moods.contains(&m)),
        }
    }
}

/// Mood totals over debits, largest amount first
pub fn mood_spending(debits: &[&Transaction]) -> Vec<MoodSpending> {
    let mut totals: Vec<MoodSpending> = Vec::new();
    for tx in debits {
        let Some(mood) = tx.mood else { continue };
        match totals.iter_mut().find(|m| m.mood == mood) {
            Some(entry) => {
                entry.amount = entry.amount.saturating_add(tx.amount);
                entry.count += 1;
            }
            None => totals.push(MoodSpending {
                mood,
                amount: tx.amount,
                count: 1,
            }),
        }
    }
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));
    totals
}

/// Impulse score for each of the last four weeks, oldest first
///
/// Windows are inclusive on both ends, so boundary days count in two weeks.
pub fn weekly_trend(txs: &[Transaction], today: NaiveDate) -> Vec<WeeklyScore> {
    (0..TREND_WEEKS)
        .rev()
        .map(|i| {
            let start = today - Duration::days(i * 7 + 7);
            let end = today - Duration::days(i * 7);
            let (debits, impulse) = txs
                .iter()
                .filter(|t| t.is_debit() && t.date >= start && t.date <= end)
                .fold((0usize, 0usize), |(d, n), t| (d + 1, n + usize::from(t.is_impulse)));
            WeeklyScore {
                week: format!("Week {}", TREND_WEEKS - i),
                start,
                end,
                score: count_percent(impulse, debits),
            }
        })
        .collect()
}

/// Trigger statistics over debits, largest amount first
pub fn trigger_analysis(debits: &[&Transaction]) -> Vec<TriggerStat> {
    let mut stats: Vec<TriggerStat> = TRIGGERS
        .iter()
        .map(|(trigger, rule)| {
            let (frequency, amount) = debits
                .iter()
                .filter(|t| rule.matches(t))
                .fold((0usize, Decimal::ZERO), |(f, a), t| (f + 1, a.saturating_add(t.amount)));
            TriggerStat {
                trigger: *trigger,
                frequency,
                amount,
            }
        })
        .filter(|s| s.frequency > 0 || s.amount > Decimal::ZERO)
        .collect();
    stats.sort_by(|a, b| b.amount.cmp(&a.amount));
    stats
}

pub fn behavioral_insights(
    txs: &[Transaction],
    today: NaiveDate,
    weekly_limit: Decimal,
) -> BehavioralInsights {
    let debits: Vec<&Transaction> = in_month(txs, MonthKey::of(today))
        .into_iter()
        .filter(|t| t.is_debit())
        .collect();

    let impulse_count = debits.iter().filter(|t| t.is_impulse).count();
    let mood_count = debits.iter().filter(|t| t.mood.is_some()).count();
    let impulse_score = count_percent(impulse_count, debits.len());
    let emotional_percentage = count_percent(mood_count, debits.len());

    let week_ago = today - Duration::days(7);
    let spent = sum_amounts(
        debits
            .iter()
            .filter(|t| t.is_impulse && t.date >= week_ago)
            .map(|t| t.amount),
    );

    BehavioralInsights {
        impulse_score,
        control: ControlLevel::from_score(impulse_score),
        emotional_percentage,
        emotional_risk: RiskLevel::from_percentage(emotional_percentage),
        mood_spending: mood_spending(&debits),
        weekly_trend: weekly_trend(txs, today),
        triggers: trigger_analysis(&debits),
        weekly_goal: WeeklyGoalProgress {
            spent,
            limit: weekly_limit,
            progress: amount_percent(spent, weekly_limit),
        },
    }
}
