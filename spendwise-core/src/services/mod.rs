//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Aggregators
//! (`analytics`, `insights`, `history`) are pure functions over a
//! transaction slice; the report service feeds them from the ledger.

pub mod analytics;
pub mod export;
pub mod history;
pub mod import;
pub mod insights;
mod ledger;
mod report;
mod settings;
pub mod state;

pub use analytics::{AnalyticsSummary, BudgetAlert, DashboardSummary, MonthKey, TimeRange};
pub use export::{AnalyticsReport, DataExport, ExportKind};
pub use history::{HistoryQuery, HistoryRow, SortField, SortOrder};
pub use import::{BatchImport, FileImport, FileStatus, ImportOrigin, ImportService};
pub use insights::BehavioralInsights;
pub use ledger::{BulkDeletePlan, BulkPeriod, DateRange, LedgerService};
pub use report::ReportService;
pub use settings::SettingsService;
pub use state::{StateChange, StateKey, StateService};
