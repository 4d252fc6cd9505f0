//! Amount cell normalization

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::{TransactionType, MAX_AMOUNT};

/// Currency symbols always stripped from amount cells
const CURRENCY_SYMBOLS: [char; 4] = ['₹', '$', '€', '£'];

/// Magnitude of an amount cell plus its credit/debit leaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedAmount {
    /// Always non-negative
    pub amount: Decimal,
    /// Credit leaning of the cell alone: a credit marker, or a positive
    /// value without a debit marker. Row direction is resolved from
    /// `marker` instead, so an unsigned amount still lands as a debit.
    pub is_credit: bool,
    /// Direction written into the cell itself (`+`/`cr`, `-`/`dr`/parentheses)
    pub marker: Option<TransactionType>,
}

impl ParsedAmount {
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A bare fraction like `.50` only counts at the start of the cell
    RE.get_or_init(|| Regex::new(r"^\.\d+|\d+(?:\.\d+)?").expect("invalid number regex"))
}

/// Rupee prefixes written as text (`Rs.`, `INR`), after any sign
fn rupee_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^([+\-(]*)(?:inr|rs)\.?").expect("invalid rupee prefix regex"))
}

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)credit|debit|cr|dr|[+\-()]").expect("invalid marker regex"))
}

/// Parse an amount cell such as `1,250.00`, `-320`, `450 CR` or `(99.50)`
///
/// Credit markers are `+`, `cr` and `credit`; debit markers are `-`, `dr`,
/// `debit` and accounting parentheses. The first number left after removing
/// markers is the magnitude; anything unreadable, or above `MAX_AMOUNT`,
/// is zero.
pub fn parse_amount(raw: &str, currency_symbol: Option<&str>) -> ParsedAmount {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    if let Some(symbol) = currency_symbol.filter(|s| !s.trim().is_empty()) {
        cleaned = cleaned.replace(symbol.trim(), "");
    }

    let lower = rupee_prefix_re().replace(&cleaned, "$1").to_lowercase();
    let explicit_credit = lower.contains('+') || lower.contains("cr");
    let explicit_debit = lower.contains('-')
        || lower.contains("dr")
        || lower.contains("debit")
        || (lower.starts_with('(') && lower.ends_with(')'));

    let stripped = marker_re().replace_all(&lower, "");
    let value = number_re()
        .find(&stripped)
        .and_then(|m| m.as_str().parse::<Decimal>().ok())
        .map(|v| v.abs())
        .filter(|v| *v <= MAX_AMOUNT)
        .unwrap_or(Decimal::ZERO);

    let marker = if explicit_credit {
        Some(TransactionType::Credit)
    } else if explicit_debit {
        Some(TransactionType::Debit)
    } else {
        None
    };

    ParsedAmount {
        amount: value,
        is_credit: explicit_credit || (!explicit_debit && value > Decimal::ZERO),
        marker,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> ParsedAmount {
        parse_amount(s, None)
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(amount("250").amount, Decimal::new(250, 0));
        assert_eq!(amount("1,250.75").amount, Decimal::new(125075, 2));
        assert_eq!(amount(" ₹ 3,200 ").amount, Decimal::new(3200, 0));
        assert_eq!(amount("$.50").amount, Decimal::new(50, 2));
        // Unsigned positive values lean credit but carry no marker
        assert!(amount("250").is_credit);
        assert_eq!(amount("250").marker, None);
    }

    #[test]
    fn test_debit_markers() {
        for raw in ["-250", "250 DR", "250.00 Debit", "(250.00)", "€-250"] {
            let parsed = amount(raw);
            assert_eq!(parsed.amount, Decimal::new(250, 0), "{}", raw);
            assert!(!parsed.is_credit, "{}", raw);
            assert_eq!(parsed.marker, Some(TransactionType::Debit), "{}", raw);
        }
    }

    #[test]
    fn test_cr_marker_always_credit() {
        for raw in ["250 CR", "-250cr", "Cr 1,000", "-(75) credit", "+12", "5 cR-"] {
            assert!(amount(raw).is_credit, "{}", raw);
            assert_eq!(amount(raw).marker, Some(TransactionType::Credit), "{}", raw);
        }
    }

    #[test]
    fn test_magnitude_never_negative() {
        for raw in ["-1", "--5", "(-3)", "-0.01", "abc", "", "-", "1e5", "₹-9,99,999.99 DR"] {
            assert!(amount(raw).amount >= Decimal::ZERO, "{}", raw);
        }
    }

    #[test]
    fn test_unreadable_is_zero() {
        assert!(amount("").is_zero());
        assert!(amount("n/a").is_zero());
        assert!(amount("0").is_zero());
        assert!(amount("0.00").is_zero());
        assert!(!amount("0").is_credit);
    }

    #[test]
    fn test_rupee_text_prefix() {
        assert_eq!(parse_amount("Rs. 1,250", Some("₹")).amount, Decimal::new(1250, 0));
        assert_eq!(amount("Rs.450").amount, Decimal::new(450, 0));
        assert_eq!(amount("rs.450").amount, Decimal::new(450, 0));
        assert_eq!(amount("INR 2,000.50").amount, Decimal::new(200050, 2));

        let parsed = amount("-Rs.99 ");
        assert_eq!(parsed.amount, Decimal::new(99, 0));
        assert_eq!(parsed.marker, Some(TransactionType::Debit));
    }

    #[test]
    fn test_amount_above_ceiling_is_zero() {
        assert!(amount("79228162514264337593543950335").is_zero());
        assert!(amount("1,000,000,000,000,001").is_zero());
        assert_eq!(amount("1,000,000,000,000,000").amount, MAX_AMOUNT);
    }

    #[test]
    fn test_configured_currency_symbol() {
        let parsed = parse_amount("Rs. 450", Some("Rs."));
        assert_eq!(parsed.amount, Decimal::new(450, 0));
        let parsed = parse_amount("CHF 12.5", Some("CHF"));
        assert_eq!(parsed.amount, Decimal::new(125, 1));
    }
}
