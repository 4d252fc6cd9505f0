//! CLI command implementations

pub mod add;
pub mod analytics;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod insights;
pub mod journal;
pub mod list;
pub mod reset;
pub mod settings;
pub mod status;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use spendwise_core::config::Config;
use spendwise_core::services::import::parse_date;
use spendwise_core::SpendwiseContext;

/// Get the spendwise directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SPENDWISE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".spendwise"))
        .context("Could not find home directory; set SPENDWISE_DIR")
}

/// Open the spendwise context
pub fn get_context() -> Result<SpendwiseContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create spendwise directory: {:?}", data_dir))?;

    SpendwiseContext::open(&data_dir).context("Failed to initialize spendwise context")
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Currency symbol used for display
pub fn currency(config: &Config) -> &str {
    config.locale.currency_symbol.as_deref().unwrap_or("")
}

/// Parse a user-entered amount; separators and currency symbols are ignored
pub fn parse_money(raw: &str) -> Result<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    Decimal::from_str(&cleaned).with_context(|| format!("Invalid amount: {}", raw))
}

/// Parse a user-entered date using the configured date order
pub fn parse_user_date(raw: &str, config: &Config) -> Result<NaiveDate> {
    parse_date(raw, config.locale.date_order)
        .with_context(|| format!("Invalid date: {} (try YYYY-MM-DD)", raw))
}

/// Shorten text for table cells
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("1,250.50").unwrap(), Decimal::new(125050, 2));
        assert_eq!(parse_money("₹300").unwrap(), Decimal::new(300, 0));
        assert!(parse_money("abc").is_err());
    }

    #[test]
    fn test_parse_user_date() {
        let config = Config::default();
        assert_eq!(
            parse_user_date("2024-03-09", &config).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
        assert_eq!(
            parse_user_date("09/03/2024", &config).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
        assert!(parse_user_date("someday", &config).is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long description", 7), "a long…");
    }
}
