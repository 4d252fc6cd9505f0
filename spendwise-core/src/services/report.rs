//! Report service - dashboard, analytics, insights and exports over the
//! persisted ledger

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use super::analytics::{
    analytics_summary, category_budget_usage, check_budget, dashboard_summary, AnalyticsSummary,
    BudgetAlert, CategoryBudgetUsage, DashboardSummary, TimeRange,
};
use super::export::{history_csv, AnalyticsReport, DataExport};
use super::history::{base_amount, history_rows, HistoryQuery, HistoryRow};
use super::insights::{behavioral_insights, BehavioralInsights};
use super::ledger::LedgerService;
use super::settings::SettingsService;
use super::state::StateService;
use crate::domain::result::Result;
use crate::domain::Transaction;

pub struct ReportService {
    ledger: LedgerService,
    settings: SettingsService,
    weekly_impulse_limit: Decimal,
}

impl ReportService {
    pub fn new(state: Arc<StateService>, weekly_impulse_limit: Decimal) -> Self {
        Self {
            ledger: LedgerService::new(Arc::clone(&state)),
            settings: SettingsService::new(state),
            weekly_impulse_limit,
        }
    }

    pub fn dashboard(&self, today: NaiveDate) -> Result<DashboardSummary> {
        let txs = self.ledger.list()?;
        Ok(dashboard_summary(
            &txs,
            self.settings.income()?,
            &self.settings.budgets()?,
            today,
        ))
    }

    pub fn category_budgets(&self, today: NaiveDate) -> Result<Vec<CategoryBudgetUsage>> {
        Ok(category_budget_usage(
            &self.ledger.list()?,
            &self.settings.budgets()?,
            today,
        ))
    }

    /// Budget alert for a transaction about to be added
    pub fn budget_alert(&self, new_tx: &Transaction, today: NaiveDate) -> Result<Option<BudgetAlert>> {
        Ok(check_budget(
            &self.ledger.list()?,
            new_tx,
            &self.settings.budgets()?,
            today,
        ))
    }

    pub fn analytics(&self, range: TimeRange, today: NaiveDate) -> Result<AnalyticsSummary> {
        Ok(analytics_summary(&self.ledger.list()?, range, today))
    }

    pub fn insights(&self, today: NaiveDate) -> Result<BehavioralInsights> {
        Ok(behavioral_insights(
            &self.ledger.list()?,
            today,
            self.weekly_impulse_limit,
        ))
    }

    /// History rows measured against income, then budget, then the fallback
    pub fn history(&self, query: &HistoryQuery) -> Result<Vec<HistoryRow>> {
        let base = base_amount(self.settings.income()?, self.settings.budgets()?.monthly);
        Ok(query.apply(history_rows(&self.ledger.list()?, base)))
    }

    pub fn history_csv(&self, query: &HistoryQuery) -> Result<String> {
        history_csv(&self.history(query)?)
    }

    pub fn analytics_report(&self, range: TimeRange, today: NaiveDate) -> Result<AnalyticsReport> {
        Ok(AnalyticsReport::build(
            &self.ledger.list()?,
            range,
            today,
            Utc::now(),
        ))
    }

    pub fn data_export(&self) -> Result<DataExport> {
        Ok(DataExport {
            transactions: self.ledger.list()?,
            income: self.settings.income()?,
            budgets: self.settings.budgets()?,
            notifications: self.settings.notifications()?,
            reflections: self.settings.reflections()?,
            goals: self.settings.goals()?,
            export_date: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::{BudgetLimits, Category, TransactionType};
    use crate::services::analytics::AlertLevel;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (LedgerService, SettingsService, ReportService) {
        let state = Arc::new(StateService::new(Arc::new(MemoryStore::new())));
        (
            LedgerService::new(Arc::clone(&state)),
            SettingsService::new(Arc::clone(&state)),
            ReportService::new(state, Decimal::from(5000)),
        )
    }

    fn debit(date: NaiveDate, amount: i64) -> Transaction {
        Transaction::new(
            date,
            Decimal::from(amount),
            TransactionType::Debit,
            Category::Shopping,
            "Order",
        )
    }

    #[test]
    fn test_dashboard_reads_settings() {
        let (ledger, settings, reports) = setup();
        ledger.add(debit(ymd(2024, 3, 3), 900)).unwrap();
        settings
            .set_budgets(&BudgetLimits {
                monthly: Decimal::from(1000),
                ..BudgetLimits::default()
            })
            .unwrap();

        let summary = reports.dashboard(ymd(2024, 3, 10)).unwrap();
        assert_eq!(summary.monthly_spending, Decimal::from(900));
        assert_eq!(summary.budget_used_percentage, 90);
        assert_eq!(summary.monthly_income, Decimal::from(50000));

        let alert = reports
            .budget_alert(&debit(ymd(2024, 3, 10), 200), ymd(2024, 3, 10))
            .unwrap()
            .unwrap();
        assert_eq!(alert.level, AlertLevel::Exceeded);
    }

    #[test]
    fn test_history_base_amount() {
        let (ledger, settings, reports) = setup();
        ledger.add(debit(ymd(2024, 3, 3), 500)).unwrap();
        settings.set_income(Decimal::from(2000)).unwrap();

        let rows = reports.history(&HistoryQuery::default()).unwrap();
        assert_eq!(rows[0].amount_left, Decimal::from(1500));
        assert_eq!(rows[0].percentage_spent, Decimal::from(25));
    }

    #[test]
    fn test_data_export() {
        let (ledger, settings, reports) = setup();
        ledger.add(debit(ymd(2024, 3, 3), 500)).unwrap();
        settings.add_goal("Cook at home").unwrap();

        let export = reports.data_export().unwrap();
        assert_eq!(export.transactions.len(), 1);
        assert_eq!(export.goals.len(), 1);
        assert_eq!(export.budgets, BudgetLimits::default());
    }
}
