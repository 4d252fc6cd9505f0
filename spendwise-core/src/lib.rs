//! Spendwise Core - statement import and spending insights
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Transaction, Category, Mood, settings)
//! - **ports**: Trait definitions for external dependencies (StateStore)
//! - **services**: Import pipeline, ledger, aggregators and exports
//! - **adapters**: Concrete implementations (JSON files, in-memory, placeholder data)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adapters::JsonFileStore;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{Category, Mood, Transaction, TransactionType};

/// Subdirectory of the data directory holding persisted state
pub const STATE_DIR: &str = "state";

/// Main context for Spendwise operations
///
/// Holds the configuration, the state store and all services. Settings
/// live at `<data_dir>/settings.json`, state under `<data_dir>/state/`.
pub struct SpendwiseContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub state: Arc<StateService>,
    pub ledger: LedgerService,
    pub settings: SettingsService,
    pub import_service: ImportService,
    pub report_service: ReportService,
}

impl SpendwiseContext {
    /// Open (creating if needed) the data directory
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let config = Config::load(data_dir)?;
        let store = JsonFileStore::new(data_dir.join(STATE_DIR))?;
        let state = Arc::new(StateService::new(Arc::new(store)));

        tracing::debug!(data_dir = %data_dir.display(), "Opened spendwise context");

        Ok(Self {
            ledger: LedgerService::new(Arc::clone(&state)),
            settings: SettingsService::new(Arc::clone(&state)),
            import_service: ImportService::new(&config),
            report_service: ReportService::new(
                Arc::clone(&state),
                config.insights.weekly_impulse_limit,
            ),
            state,
            config,
            data_dir: data_dir.to_path_buf(),
        })
    }
}
