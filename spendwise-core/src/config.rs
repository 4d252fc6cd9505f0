//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "locale": { "dateOrder": "dayFirst", "currencySymbol": "₹" },
//!   "import": { "impulsePolicy": "unflagged", "impulseRate": 0.15,
//!               "dateFallback": "estimate", "placeholderFallback": true },
//!   "insights": { "weeklyImpulseLimit": "5000" }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "settings.json";

/// Weekly impulse spending considered healthy
pub const DEFAULT_WEEKLY_IMPULSE_LIMIT: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Share of debit rows flagged when impulse sampling is on
pub const DEFAULT_IMPULSE_RATE: f64 = 0.15;

/// How to read ambiguous numeric dates like `01/02/2024`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateOrder {
    /// DD/MM/YYYY
    #[default]
    DayFirst,
    /// MM/DD/YYYY
    MonthFirst,
}

impl std::str::FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "dayfirst" | "dmy" => Ok(DateOrder::DayFirst),
            "monthfirst" | "mdy" => Ok(DateOrder::MonthFirst),
            other => Err(format!("Unknown date order: {}", other)),
        }
    }
}

/// How imported debit rows get their impulse flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImpulsePolicy {
    /// Never flagged unless the file has an impulse column
    #[default]
    Unflagged,
    /// Independent random draw per debit row
    Sampled,
}

/// What to do with a row whose date cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateFallback {
    /// Keep the row with a recent estimated date
    #[default]
    Estimate,
    /// Drop the row
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleSettings {
    #[serde(default)]
    pub date_order: DateOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            date_order: DateOrder::default(),
            currency_symbol: Some("₹".to_string()),
            other: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSettings {
    #[serde(default)]
    pub impulse_policy: ImpulsePolicy,
    #[serde(default = "default_impulse_rate")]
    pub impulse_rate: f64,
    #[serde(default)]
    pub date_fallback: DateFallback,
    #[serde(default = "default_true")]
    pub placeholder_fallback: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            impulse_policy: ImpulsePolicy::default(),
            impulse_rate: DEFAULT_IMPULSE_RATE,
            date_fallback: DateFallback::default(),
            placeholder_fallback: true,
            other: HashMap::new(),
        }
    }
}

impl ImportSettings {
    /// Impulse rate clamped to a valid probability
    pub fn effective_impulse_rate(&self) -> f64 {
        if self.impulse_rate.is_finite() {
            self.impulse_rate.clamp(0.0, 1.0)
        } else {
            DEFAULT_IMPULSE_RATE
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsSettings {
    #[serde(default = "default_weekly_limit")]
    pub weekly_impulse_limit: Decimal,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for InsightsSettings {
    fn default() -> Self {
        Self {
            weekly_impulse_limit: DEFAULT_WEEKLY_IMPULSE_LIMIT,
            other: HashMap::new(),
        }
    }
}

fn default_impulse_rate() -> f64 {
    DEFAULT_IMPULSE_RATE
}

fn default_true() -> bool {
    true
}

fn default_weekly_limit() -> Decimal {
    DEFAULT_WEEKLY_IMPULSE_LIMIT
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    locale: LocaleSettings,
    #[serde(default)]
    import: ImportSettings,
    #[serde(default)]
    insights: InsightsSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Spendwise configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub locale: LocaleSettings,
    pub import: ImportSettings,
    pub insights: InsightsSettings,
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or malformed file yields defaults. Environment overrides:
    /// - `SPENDWISE_PLACEHOLDER` toggles placeholder data for unparseable files
    /// - `SPENDWISE_DATE_ORDER` sets `dayFirst` or `monthFirst`
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        let mut config = Self {
            locale: raw.locale,
            import: raw.import,
            insights: raw.insights,
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        match std::env::var("SPENDWISE_PLACEHOLDER").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => self.import.placeholder_fallback = true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => self.import.placeholder_fallback = false,
            _ => {}
        }

        if let Ok(value) = std::env::var("SPENDWISE_DATE_ORDER") {
            match value.parse() {
                Ok(order) => self.locale.date_order = order,
                Err(e) => tracing::warn!("Ignoring SPENDWISE_DATE_ORDER: {}", e),
            }
        }
    }

    /// Save config to the data directory
    /// Preserves settings this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;
        settings.locale = self.locale.clone();
        settings.import = self.import.clone();
        settings.insights = self.insights.clone();

        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }

    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!("Malformed {}, using defaults: {}", SETTINGS_FILE, e);
        SettingsFile::default()
    }))
}
