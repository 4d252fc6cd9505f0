//! Delimited statement parsing
//!
//! Turns CSV-like statement text into transactions. Column roles are guessed
//! from the header row; rows that cannot be used are skipped one at a time
//! and never abort the file.

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

use super::amounts::parse_amount;
use super::classify::{detect_category, impulse_from_cell, mood_from_cell, resolve_type};
use super::dates::{estimate_date, parse_date};
use crate::config::{Config, DateFallback, DateOrder, ImpulsePolicy};
use crate::domain::{Transaction, TransactionType};

/// Knobs for reading one statement
#[derive(Debug, Clone, PartialEq)]
pub struct StatementOptions {
    pub date_order: DateOrder,
    pub currency_symbol: Option<String>,
    pub impulse_policy: ImpulsePolicy,
    pub impulse_rate: f64,
    pub date_fallback: DateFallback,
}

impl Default for StatementOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl StatementOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            date_order: config.locale.date_order,
            currency_symbol: config.locale.currency_symbol.clone(),
            impulse_policy: config.import.impulse_policy,
            impulse_rate: config.import.effective_impulse_rate(),
            date_fallback: config.import.date_fallback,
        }
    }
}

/// Which column holds which field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnLayout {
    pub date: usize,
    pub description: usize,
    pub amount: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impulse: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<usize>,
}

/// Outcome of parsing one statement
#[derive(Debug, Clone, Default)]
pub struct ParsedStatement {
    pub transactions: Vec<Transaction>,
    /// Data rows dropped (too few columns, zero amount, unreadable date)
    pub skipped_rows: usize,
    /// Rows kept with an estimated date
    pub estimated_dates: usize,
}

/// Tab, then semicolon, else comma
pub fn detect_delimiter(header_line: &str) -> u8 {
    if header_line.contains('\t') {
        b'\t'
    } else if header_line.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Guess column roles from header cells
///
/// Each header matches at most one role, checked in order date, amount,
/// description, type, impulse, mood. Only the first amount-like column is
/// used; later amount-like columns (e.g. a running balance) are ignored
/// rather than reconsidered for other roles. Unresolved date, description
/// and amount columns default to positions 0, 1 and min(2, last).
pub fn detect_columns<S: AsRef<str>>(headers: &[S]) -> ColumnLayout {
    let mut date = None;
    let mut amount = None;
    let mut description = None;
    let mut kind = None;
    let mut impulse = None;
    let mut mood = None;

    for (idx, header) in headers.iter().enumerate() {
        let header = clean_cell(header.as_ref()).to_lowercase();
        if header.contains("date") {
            date = Some(idx);
        } else if ["amount", "credit", "debit", "value", "balance"]
            .iter()
            .any(|p| header.contains(p))
        {
            amount.get_or_insert(idx);
        } else if ["description", "narration", "particulars", "details", "transaction"]
            .iter()
            .any(|p| header.contains(p))
        {
            description = Some(idx);
        } else if header.contains("type") {
            kind = Some(idx);
        } else if header.contains("impulse") {
            impulse = Some(idx);
        } else if header.contains("mood") {
            mood = Some(idx);
        }
    }

    let last = headers.len().saturating_sub(1);
    ColumnLayout {
        date: date.unwrap_or(0),
        description: description.unwrap_or(1),
        amount: amount.unwrap_or_else(|| last.min(2)),
        kind,
        impulse,
        mood,
    }
}

/// Parse statement text
///
/// The first non-blank line is the header. Each data row needs at least two
/// columns and a non-zero amount.
pub fn parse_statement<R: Rng + ?Sized>(
    content: &str,
    options: &StatementOptions,
    today: NaiveDate,
    rng: &mut R,
) -> ParsedStatement {
    let mut parsed = ParsedStatement::default();

    let Some(header_line) = content.lines().find(|l| !l.trim().is_empty()) else {
        return parsed;
    };
    let delimiter = detect_delimiter(header_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader
        .records()
        .filter(|r| !matches!(r, Ok(rec) if rec.iter().all(|c| c.trim().is_empty())));

    let layout = match records.next() {
        Some(Ok(header)) => detect_columns(&header.iter().collect::<Vec<_>>()),
        Some(Err(e)) => {
            tracing::warn!("Unreadable statement header: {}", e);
            return parsed;
        }
        None => return parsed,
    };
    tracing::debug!(
        delimiter = %char::from(delimiter).escape_default(),
        ?layout,
        "Detected statement layout"
    );

    for (idx, record) in records.enumerate() {
        let row = idx + 1;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(row, "Skipping unreadable row: {}", e);
                parsed.skipped_rows += 1;
                continue;
            }
        };
        let cells: Vec<&str> = record.iter().collect();
        match parse_row(&cells, row, &layout, options, today, rng) {
            RowOutcome::Parsed {
                transaction,
                estimated_date,
            } => {
                if estimated_date {
                    parsed.estimated_dates += 1;
                }
                parsed.transactions.push(transaction);
            }
            RowOutcome::Skipped(reason) => {
                tracing::warn!(row, "Skipping row: {}", reason);
                parsed.skipped_rows += 1;
            }
        }
    }

    parsed
}

enum RowOutcome {
    Parsed {
        transaction: Transaction,
        estimated_date: bool,
    },
    Skipped(&'static str),
}

fn parse_row<R: Rng + ?Sized>(
    cells: &[&str],
    row: usize,
    layout: &ColumnLayout,
    options: &StatementOptions,
    today: NaiveDate,
    rng: &mut R,
) -> RowOutcome {
    if cells.len() < 2 {
        return RowOutcome::Skipped("fewer than two columns");
    }
    let cell = |idx: usize| cells.get(idx).map(|c| clean_cell(c)).unwrap_or("");
    // Quote characters inside a description belong to the text
    let text = |idx: usize| cells.get(idx).map(|c| c.trim()).unwrap_or("");

    let amount = parse_amount(cell(layout.amount), options.currency_symbol.as_deref());
    if amount.is_zero() {
        return RowOutcome::Skipped("zero or missing amount");
    }

    let (date, estimated_date) = match parse_date(cell(layout.date), options.date_order) {
        Some(date) => (date, false),
        None => match options.date_fallback {
            DateFallback::Estimate => (estimate_date(today, rng), true),
            DateFallback::Skip => return RowOutcome::Skipped("unreadable date"),
        },
    };

    let description = match text(layout.description) {
        "" => format!("Transaction {}", row),
        desc => desc.to_string(),
    };

    let kind = resolve_type(layout.kind.map(cell), &description, amount.marker);
    let category = detect_category(&description);

    let is_impulse = kind == TransactionType::Debit
        && match layout.impulse.map(cell).and_then(impulse_from_cell) {
            Some(flag) => flag,
            None => match options.impulse_policy {
                ImpulsePolicy::Unflagged => false,
                ImpulsePolicy::Sampled => rng.gen_bool(options.impulse_rate.clamp(0.0, 1.0)),
            },
        };
    let mood = layout.mood.map(cell).and_then(mood_from_cell);

    let transaction = Transaction::new(date, amount.amount, kind, category, description)
        .with_mood(mood)
        .with_impulse(is_impulse)
        .normalized();

    RowOutcome::Parsed {
        transaction,
        estimated_date,
    }
}

/// Trim a value cell, including stray quotes the csv reader left in place
fn clean_cell(cell: &str) -> &str {
    cell.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Mood};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn parse(content: &str) -> ParsedStatement {
        let mut rng = StdRng::seed_from_u64(11);
        parse_statement(content, &StatementOptions::default(), today(), &mut rng)
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("Date\tDescription;x,y"), b'\t');
        assert_eq!(detect_delimiter("Date;Description,Amount"), b';');
        assert_eq!(detect_delimiter("Date,Description,Amount"), b',');
        assert_eq!(detect_delimiter("Date Description"), b',');
    }

    #[test]
    fn test_detect_columns_bank_export() {
        let layout = detect_columns(&[
            "Txn Date",
            "Value Date",
            "Narration",
            "Debit",
            "Credit",
            "Balance",
            "Type",
        ]);
        // Last date-like header wins, first amount-like header wins
        assert_eq!(layout.date, 1);
        assert_eq!(layout.description, 2);
        assert_eq!(layout.amount, 3);
        assert_eq!(layout.kind, Some(6));
    }

    #[test]
    fn test_detect_columns_defaults() {
        let layout = detect_columns(&["foo", "bar", "baz", "qux"]);
        assert_eq!((layout.date, layout.description, layout.amount), (0, 1, 2));
        let layout = detect_columns(&["foo", "bar"]);
        assert_eq!(layout.amount, 1);
        assert_eq!(layout.kind, None);
    }

    #[test]
    fn test_detect_columns_history_export() {
        let layout = detect_columns(&[
            "S.No",
            "Transaction",
            "Date",
            "Amount Debit",
            "Current Amount Left",
            "% Spent",
            "Type",
            "Impulse Spent",
            "Mood",
        ]);
        assert_eq!(layout.description, 1);
        assert_eq!(layout.date, 2);
        assert_eq!(layout.amount, 3);
        assert_eq!(layout.kind, Some(6));
        assert_eq!(layout.impulse, Some(7));
        assert_eq!(layout.mood, Some(8));
    }

    #[test]
    fn test_single_starbucks_row() {
        let parsed = parse("Date,Description,Amount\n01/02/2024,Starbucks Coffee,250\n");
        assert_eq!(parsed.transactions.len(), 1);
        let tx = &parsed.transactions[0];
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(tx.category, Category::FoodAndDining);
        assert_eq!(tx.kind, TransactionType::Debit);
        assert_eq!(tx.amount, Decimal::new(250, 0));
        assert_eq!(tx.description, "Starbucks Coffee");
        assert!(!tx.is_impulse);
    }

    #[test]
    fn test_zero_amount_row_skipped() {
        let parsed = parse("Date,Description,Amount\n01/02/2024,Adjustment,0\n02/02/2024,Uber,120\n");
        assert_eq!(parsed.transactions.len(), 1);
        assert_eq!(parsed.skipped_rows, 1);
        assert_eq!(parsed.transactions[0].description, "Uber");
    }

    #[test]
    fn test_salary_is_credit_without_marker() {
        let parsed = parse("Date,Description,Amount\n01/03/2024,SALARY MARCH,85000\n");
        assert_eq!(parsed.transactions[0].kind, TransactionType::Credit);
        assert!(!parsed.transactions[0].is_impulse);
    }

    #[test]
    fn test_semicolon_and_quotes() {
        let content = "\"Date\";\"Narration\";\"Amount\"\n\"05.03.2024\";\"Zomato; late dinner\";\"450\"\n";
        let parsed = parse(content);
        assert_eq!(parsed.transactions.len(), 1);
        let tx = &parsed.transactions[0];
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(tx.description, "Zomato; late dinner");
        assert_eq!(tx.category, Category::FoodAndDining);
        assert_eq!(tx.amount, Decimal::new(450, 0));
    }

    #[test]
    fn test_description_keeps_quote_characters() {
        let content = "Date,Description,Amount\n\
                       01/03/2024,\"Concert \"\"VIP\"\"\",1500\n\
                       02/03/2024,'Tis the season,800\n\
                       03/03/2024,Dinner,'1200'\n";
        let parsed = parse(content);
        let descriptions: Vec<_> = parsed.transactions.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, ["Concert \"VIP\"", "'Tis the season", "Dinner"]);
        // Value cells still shed stray quotes
        assert_eq!(parsed.transactions[2].amount, Decimal::new(1200, 0));
    }

    #[test]
    fn test_amount_above_ceiling_skips_row() {
        let content = "Date,Description,Amount\n\
                       01/02/2024,Huge,79228162514264337593543950335\n\
                       02/02/2024,Lunch,120\n";
        let parsed = parse(content);
        assert_eq!(parsed.transactions.len(), 1);
        assert_eq!(parsed.skipped_rows, 1);
        assert_eq!(parsed.transactions[0].amount, Decimal::new(120, 0));
    }

    #[test]
    fn test_tab_delimited_with_type_column() {
        let content = "Date\tDetails\tAmount\tType\n2024-03-01\tAmazon refund\t499\tDR\n2024-03-02\tNEFT from Ravi\t2000\tCR\n";
        let parsed = parse(content);
        assert_eq!(parsed.transactions.len(), 2);
        assert_eq!(parsed.transactions[0].kind, TransactionType::Debit);
        assert_eq!(parsed.transactions[1].kind, TransactionType::Credit);
    }

    #[test]
    fn test_short_rows_and_blank_lines() {
        let content = "\n\nDate,Description,Amount\n\njunk\n10/03/2024,,75\n";
        let parsed = parse(content);
        assert_eq!(parsed.transactions.len(), 1);
        assert_eq!(parsed.skipped_rows, 1);
        assert_eq!(parsed.transactions[0].description, "Transaction 2");
    }

    #[test]
    fn test_unreadable_date_estimated_or_skipped() {
        let content = "Date,Description,Amount\nsometime,Movie Ticket,300\n";

        let parsed = parse(content);
        assert_eq!(parsed.transactions.len(), 1);
        assert_eq!(parsed.estimated_dates, 1);
        let date = parsed.transactions[0].date;
        assert!(date <= today() && date > today() - chrono::Duration::days(60));

        let options = StatementOptions {
            date_fallback: DateFallback::Skip,
            ..StatementOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let parsed = parse_statement(content, &options, today(), &mut rng);
        assert!(parsed.transactions.is_empty());
        assert_eq!(parsed.skipped_rows, 1);
    }

    #[test]
    fn test_impulse_column_and_mood() {
        let content = "Date,Description,Amount,Impulse,Mood\n\
                       01/03/2024,Myntra Shopping,1650,Yes,Bored\n\
                       02/03/2024,Electricity Bill,1200,No,Not tracked\n\
                       03/03/2024,Refund Myntra,1650,Yes,Happy\n";
        let parsed = parse(content);
        assert_eq!(parsed.transactions.len(), 3);
        assert!(parsed.transactions[0].is_impulse);
        assert_eq!(parsed.transactions[0].mood, Some(Mood::Bored));
        assert!(!parsed.transactions[1].is_impulse);
        assert_eq!(parsed.transactions[1].mood, None);
        // Credits never carry impulse or mood
        assert_eq!(parsed.transactions[2].kind, TransactionType::Credit);
        assert!(!parsed.transactions[2].is_impulse);
        assert_eq!(parsed.transactions[2].mood, None);
    }

    #[test]
    fn test_sampled_impulse_only_on_debits() {
        let mut content = String::from("Date,Description,Amount\n");
        for i in 0..200 {
            content.push_str(&format!("01/03/2024,Swiggy Order {},320\n", i));
            content.push_str(&format!("01/03/2024,Salary part {},1000\n", i));
        }
        let options = StatementOptions {
            impulse_policy: ImpulsePolicy::Sampled,
            impulse_rate: 0.15,
            ..StatementOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(99);
        let parsed = parse_statement(&content, &options, today(), &mut rng);

        let flagged = parsed.transactions.iter().filter(|t| t.is_impulse).count();
        assert!(flagged > 5 && flagged < 80, "flagged {}", flagged);
        assert!(parsed
            .transactions
            .iter()
            .filter(|t| t.is_credit())
            .all(|t| !t.is_impulse));
    }

    #[test]
    fn test_unflagged_policy_never_flags() {
        let mut content = String::from("Date,Description,Amount\n");
        for i in 0..50 {
            content.push_str(&format!("01/03/2024,Swiggy Order {},320\n", i));
        }
        let parsed = parse(&content);
        assert_eq!(parsed.transactions.len(), 50);
        assert!(parsed.transactions.iter().all(|t| !t.is_impulse));
    }

    #[test]
    fn test_empty_content() {
        let parsed = parse("");
        assert!(parsed.transactions.is_empty());
        let parsed = parse("Date,Description,Amount\n");
        assert!(parsed.transactions.is_empty());
        assert_eq!(parsed.skipped_rows, 0);
    }

    #[test]
    fn test_long_description_truncated() {
        let content = format!("Date,Description,Amount\n01/03/2024,{},10\n", "x".repeat(300));
        let parsed = parse(&content);
        assert_eq!(parsed.transactions[0].description.chars().count(), 200);
    }
}
