//! Placeholder statement data
//!
//! Used when an uploaded file is not delimited text, or when parsing it
//! produced no usable rows. Everything returned here is fabricated; callers
//! label the result as placeholder data so it is never mistaken for a parsed
//! statement.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::domain::{Category, Transaction, TransactionType};

/// Bytes of input per generated record
pub const BYTES_PER_RECORD: u64 = 500;

/// Upper bound on generated records per file
pub const MAX_RECORDS: usize = 30;

/// Generated dates fall within this many days before today
const DATE_WINDOW_DAYS: i64 = 90;

/// Share of generated debits flagged as impulse
pub const PLACEHOLDER_IMPULSE_RATE: f64 = 0.2;

struct Template {
    description: &'static str,
    amount: i64,
    kind: TransactionType,
    category: Category,
}

const fn credit(description: &'static str, amount: i64, category: Category) -> Template {
    Template {
        description,
        amount,
        kind: TransactionType::Credit,
        category,
    }
}

const fn debit(description: &'static str, amount: i64, category: Category) -> Template {
    Template {
        description,
        amount,
        kind: TransactionType::Debit,
        category,
    }
}

static CATALOGUE: [Template; 25] = [
    // Income
    credit("Salary Credit", 45000, Category::Other),
    credit("Freelance Payment", 15000, Category::Other),
    credit("Interest Credit", 250, Category::Other),
    credit("Cashback Amazon", 120, Category::Shopping),
    // Food
    debit("Swiggy Order", 320, Category::FoodAndDining),
    debit("Zomato Payment", 450, Category::FoodAndDining),
    debit("Starbucks Coffee", 280, Category::FoodAndDining),
    debit("Restaurant Bill", 850, Category::FoodAndDining),
    debit("Grocery Store", 1250, Category::FoodAndDining),
    // Shopping
    debit("Amazon Purchase", 1890, Category::Shopping),
    debit("Flipkart Order", 2340, Category::Shopping),
    debit("Myntra Shopping", 1650, Category::Shopping),
    debit("Local Store", 560, Category::Shopping),
    // Transport
    debit("Uber Ride", 180, Category::TravelAndTransport),
    debit("Ola Cab", 220, Category::TravelAndTransport),
    debit("Petrol Station", 1500, Category::TravelAndTransport),
    debit("Metro Card Recharge", 500, Category::TravelAndTransport),
    // Bills
    debit("Electricity Bill", 1200, Category::BillsAndUtilities),
    debit("Internet Bill", 699, Category::BillsAndUtilities),
    debit("Mobile Recharge", 399, Category::BillsAndUtilities),
    // Entertainment
    debit("Netflix Subscription", 199, Category::Entertainment),
    debit("Movie Ticket", 300, Category::Entertainment),
    debit("Spotify Premium", 119, Category::Entertainment),
    // Health
    debit("Medical Checkup", 800, Category::Healthcare),
    debit("Pharmacy Purchase", 340, Category::Healthcare),
];

/// Number of records generated for a file of `byte_len` bytes
pub fn placeholder_count(byte_len: u64) -> usize {
    let count = byte_len / BYTES_PER_RECORD;
    usize::try_from(count).map_or(MAX_RECORDS, |c| c.min(MAX_RECORDS))
}

/// Generate placeholder transactions for a file of `byte_len` bytes
///
/// Each record is drawn from a fixed catalogue, its amount jittered to
/// 70%..130% of the template and rounded to a whole unit. Debits are
/// flagged as impulse at `PLACEHOLDER_IMPULSE_RATE`. Results are sorted
/// newest first.
pub fn generate_placeholder_transactions<R: Rng + ?Sized>(
    byte_len: u64,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<Transaction> {
    let count = placeholder_count(byte_len);
    let mut transactions: Vec<Transaction> = (0..count)
        .map(|_| create_transaction(&CATALOGUE[rng.gen_range(0..CATALOGUE.len())], today, rng))
        .collect();

    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    transactions
}

fn create_transaction<R: Rng + ?Sized>(
    template: &Template,
    today: NaiveDate,
    rng: &mut R,
) -> Transaction {
    let date = today - Duration::days(rng.gen_range(0..DATE_WINDOW_DAYS));

    let variation: f64 = rng.gen_range(0.7..1.3);
    let jittered = (template.amount as f64 * variation).round();
    let amount = Decimal::from_f64(jittered)
        .unwrap_or_else(|| Decimal::from(template.amount))
        .max(Decimal::ONE);

    let is_impulse =
        template.kind == TransactionType::Debit && rng.gen_bool(PLACEHOLDER_IMPULSE_RATE);

    Transaction::new(
        date,
        amount,
        template.kind,
        template.category.clone(),
        template.description,
    )
    .with_impulse(is_impulse)
}
