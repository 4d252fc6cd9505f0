//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::{Decimal, RoundingStrategy};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format an amount with a currency symbol and thousands separators
///
/// Whole amounts print without decimals, others with two.
pub fn money(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let abs = rounded.abs();
    let whole = abs.trunc();
    let fraction = abs - whole;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if fraction.is_zero() {
        format!("{}{}{}", sign, symbol, grouped)
    } else {
        let cents = (fraction * Decimal::ONE_HUNDRED).trunc();
        format!("{}{}{}.{:0>2}", sign, symbol, grouped, cents.to_string())
    }
}

/// Color a percentage green, yellow or red against warning/danger thresholds
pub fn percent_colored(value: f64, warn: f64, danger: f64) -> String {
    let text = format!("{:.1}%", value);
    if value >= danger {
        text.red().to_string()
    } else if value >= warn {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}
