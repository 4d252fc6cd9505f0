//! Date cell normalization

use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use rand::Rng;
use regex::Regex;

use crate::config::DateOrder;

/// Estimated dates fall within this many days before today
pub const ESTIMATE_WINDOW_DAYS: i64 = 60;

/// Unambiguous textual formats tried before the numeric heuristics
const GENERIC_DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%a, %d %b %Y",
    "%A, %B %d, %Y",
];

const GENERIC_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"))
}

fn short_year_last_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4})$").expect("invalid dmy regex")
    })
}

fn year_first_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})[/\-.](\d{1,2})[/\-.](\d{1,2})$").expect("invalid ymd regex")
    })
}

fn day_month_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(\d{1,2})[\s\-]+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?[\s\-,]+(\d{4})$")
            .expect("invalid month name regex")
    })
}

/// Parse a statement date cell
///
/// Tries, in order: unambiguous textual formats (ISO, RFC 3339, RFC 2822,
/// `February 1, 2024`, `15-Jan-2024`), numeric `DD/MM/YYYY` or `MM/DD/YYYY`
/// per `order` (the other order is tried when the first is not a real date),
/// `YYYY/MM/DD`, then `DD Mon YYYY`. A trailing time of day is ignored.
pub fn parse_date(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return None;
    }

    parse_with_order(&cleaned, order).or_else(|| {
        // "01/02/2024 10:30:00" and friends
        let (head, _) = cleaned.split_once(' ')?;
        parse_with_order(head, order)
    })
}

/// A recent date standing in for one that could not be read
pub fn estimate_date<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> NaiveDate {
    today - Duration::days(rng.gen_range(0..ESTIMATE_WINDOW_DAYS))
}

fn clean(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    whitespace_re().replace_all(trimmed.trim(), " ").into_owned()
}

fn parse_with_order(s: &str, order: DateOrder) -> Option<NaiveDate> {
    parse_generic(s)
        .or_else(|| parse_numeric(s, order))
        .or_else(|| parse_year_first(s))
        .or_else(|| parse_day_month_name(s))
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    GENERIC_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            GENERIC_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_numeric(s: &str, order: DateOrder) -> Option<NaiveDate> {
    let caps = short_year_last_re().captures(s)?;
    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    let (day, month) = match order {
        DateOrder::DayFirst => (first, second),
        DateOrder::MonthFirst => (second, first),
    };
    NaiveDate::from_ymd_opt(year, month, day).or_else(|| NaiveDate::from_ymd_opt(year, day, month))
}

fn parse_year_first(s: &str) -> Option<NaiveDate> {
    let caps = year_first_re().captures(s)?;
    NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
}

fn parse_day_month_name(s: &str) -> Option<NaiveDate> {
    let caps = day_month_name_re().captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_from_abbrev(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_from_abbrev(abbrev: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let lower = abbrev.to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lower)
        .map(|idx| idx as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day_first(s: &str) -> Option<NaiveDate> {
        parse_date(s, DateOrder::DayFirst)
    }

    #[test]
    fn test_day_first_grid() {
        for year in [1999, 2024, 2025] {
            for month in 1..=12u32 {
                for day in 1..=31u32 {
                    let Some(expected) = NaiveDate::from_ymd_opt(year, month, day) else {
                        continue;
                    };
                    for sep in ['/', '-', '.'] {
                        let s = format!("{:02}{sep}{:02}{sep}{}", day, month, year);
                        assert_eq!(day_first(&s), Some(expected), "{}", s);
                        let s = format!("{}{sep}{}{sep}{}", day, month, year);
                        assert_eq!(day_first(&s), Some(expected), "{}", s);
                    }
                }
            }
        }
    }

    #[test]
    fn test_month_first_order() {
        assert_eq!(parse_date("01/02/2024", DateOrder::MonthFirst), Some(ymd(2024, 1, 2)));
        assert_eq!(parse_date("01/02/2024", DateOrder::DayFirst), Some(ymd(2024, 2, 1)));
    }

    #[test]
    fn test_swaps_when_primary_order_is_invalid() {
        assert_eq!(day_first("12/25/2024"), Some(ymd(2024, 12, 25)));
        assert_eq!(parse_date("25/12/2024", DateOrder::MonthFirst), Some(ymd(2024, 12, 25)));
    }

    #[test]
    fn test_generic_formats() {
        assert_eq!(day_first("2024-02-01"), Some(ymd(2024, 2, 1)));
        assert_eq!(day_first("2024-02-01T10:30:00Z"), Some(ymd(2024, 2, 1)));
        assert_eq!(day_first("2024-02-01T10:30:00.000Z"), Some(ymd(2024, 2, 1)));
        assert_eq!(day_first("2024-02-01 10:30:00"), Some(ymd(2024, 2, 1)));
        assert_eq!(day_first("February 1, 2024"), Some(ymd(2024, 2, 1)));
        assert_eq!(day_first("Jan 15, 2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(day_first("15-Jan-2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(day_first("Thu, 01 Feb 2024 10:00:00 +0000"), Some(ymd(2024, 2, 1)));
    }

    #[test]
    fn test_year_first_and_month_names() {
        assert_eq!(day_first("2024/3/9"), Some(ymd(2024, 3, 9)));
        assert_eq!(day_first("2024.03.09"), Some(ymd(2024, 3, 9)));
        assert_eq!(day_first("15 Jan 2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(day_first("15  jan   2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(day_first("5 Sept 2024"), Some(ymd(2024, 9, 5)));
    }

    #[test]
    fn test_trailing_time_and_quotes() {
        assert_eq!(day_first("\"01/02/2024\""), Some(ymd(2024, 2, 1)));
        assert_eq!(day_first("01/02/2024 10:30"), Some(ymd(2024, 2, 1)));
    }

    #[test]
    fn test_unreadable() {
        assert_eq!(day_first(""), None);
        assert_eq!(day_first("yesterday"), None);
        assert_eq!(day_first("32/13/2024"), None);
        assert_eq!(day_first("31/02/2024"), None);
    }

    #[test]
    fn test_estimate_stays_in_window() {
        let today = ymd(2024, 3, 15);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let date = estimate_date(today, &mut rng);
            assert!(date <= today);
            assert!(date > today - Duration::days(ESTIMATE_WINDOW_DAYS));
        }
    }
}
