//! Category and transaction type heuristics

use crate::domain::{Category, Mood, TransactionType};

/// Description keywords per category, scanned in declaration order
static CATEGORY_KEYWORDS: [(Category, &[&str]); 7] = [
    (
        Category::FoodAndDining,
        &[
            "restaurant", "cafe", "food", "dining", "pizza", "burger", "coffee", "tea", "lunch",
            "dinner", "breakfast", "snack", "meal", "kitchen", "grocery", "supermarket", "swiggy",
            "zomato", "dominos", "mcdonald", "kfc", "subway", "starbucks", "bakery", "hotel",
            "canteen", "mess",
        ],
    ),
    (
        Category::Shopping,
        &[
            "amazon", "flipkart", "myntra", "shopping", "store", "mall", "purchase", "buy", "shop",
            "clothes", "clothing", "fashion", "shoes", "electronics", "mobile", "laptop", "book",
            "pharmacy", "medicine", "cosmetics", "jewelry", "gift", "online", "retail",
        ],
    ),
    (
        Category::TravelAndTransport,
        &[
            "uber", "ola", "taxi", "auto", "bus", "train", "flight", "airport", "petrol", "diesel",
            "fuel", "parking", "toll", "metro", "railway", "booking", "travel", "ticket", "cab",
            "transport", "vehicle", "car", "bike", "scooter",
        ],
    ),
    (
        Category::BillsAndUtilities,
        &[
            "electricity", "water", "gas", "internet", "wifi", "mobile", "phone", "recharge",
            "bill", "utility", "maintenance", "rent", "emi", "loan", "insurance", "tax",
            "government", "municipal", "service", "repair", "broadband",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "movie", "cinema", "theatre", "netflix", "prime", "spotify", "music", "game", "gaming",
            "entertainment", "fun", "party", "club", "bar", "alcohol", "beer", "wine", "concert",
            "event", "ticket", "subscription", "streaming",
        ],
    ),
    (
        Category::Healthcare,
        &[
            "hospital", "doctor", "medical", "medicine", "pharmacy", "health", "clinic", "dental",
            "surgery", "treatment", "checkup", "test", "lab", "tablet", "injection",
            "consultation", "therapy",
        ],
    ),
    (
        Category::Education,
        &[
            "school", "college", "university", "education", "course", "class", "tuition", "fees",
            "book", "study", "exam", "certificate", "training", "workshop", "seminar", "learning",
        ],
    ),
];

/// Description keywords that mark money coming in
const CREDIT_KEYWORDS: [&str; 14] = [
    "salary",
    "income",
    "credit",
    "deposit",
    "refund",
    "cashback",
    "bonus",
    "interest",
    "dividend",
    "transfer",
    "received",
    "payment received",
    "reversal",
    "reward",
];

/// First category whose keyword appears in the description, else `Other`
pub fn detect_category(description: &str) -> Category {
    let desc = description.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| desc.contains(k)))
        .map(|(category, _)| category.clone())
        .unwrap_or(Category::Other)
}

pub fn has_credit_keyword(description: &str) -> bool {
    let desc = description.to_lowercase();
    CREDIT_KEYWORDS.iter().any(|k| desc.contains(k))
}

/// Read an explicit type column value
pub fn type_from_cell(cell: &str) -> Option<TransactionType> {
    let value = cell.trim().to_lowercase();
    if value.contains("credit") || value == "cr" {
        Some(TransactionType::Credit)
    } else if value.contains("debit") || value == "dr" {
        Some(TransactionType::Debit)
    } else {
        None
    }
}

/// Resolve the direction of a statement row
///
/// An explicit type cell wins, then credit keywords in the description,
/// then a sign or marker written into the amount cell. Anything else is a
/// debit: an unsigned amount says nothing about direction.
pub fn resolve_type(
    type_cell: Option<&str>,
    description: &str,
    amount_marker: Option<TransactionType>,
) -> TransactionType {
    if let Some(kind) = type_cell.and_then(type_from_cell) {
        return kind;
    }
    if has_credit_keyword(description) {
        return TransactionType::Credit;
    }
    amount_marker.unwrap_or(TransactionType::Debit)
}

/// Read an impulse flag cell (`Yes`/`No`, `true`/`false`, `1`/`0`)
pub fn impulse_from_cell(cell: &str) -> Option<bool> {
    match cell.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Read a mood cell; labels like `Not tracked` read as no mood
pub fn mood_from_cell(cell: &str) -> Option<Mood> {
    cell.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_category() {
        assert_eq!(detect_category("Starbucks Coffee"), Category::FoodAndDining);
        assert_eq!(detect_category("AMAZON PAY INDIA"), Category::Shopping);
        assert_eq!(detect_category("Uber trip 1234"), Category::TravelAndTransport);
        assert_eq!(detect_category("Electricity board"), Category::BillsAndUtilities);
        assert_eq!(detect_category("Netflix.com"), Category::Entertainment);
        assert_eq!(detect_category("Apollo Hospital"), Category::Healthcare);
        assert_eq!(detect_category("University fees"), Category::Education);
        assert_eq!(detect_category("NEFT 99812"), Category::Other);
        assert_eq!(detect_category(""), Category::Other);
    }

    #[test]
    fn test_category_declaration_order_wins() {
        // "mobile" is both a shopping and a bills keyword
        assert_eq!(detect_category("Mobile Recharge"), Category::Shopping);
        // "pharmacy" is listed under shopping before healthcare
        assert_eq!(detect_category("Pharmacy Purchase"), Category::Shopping);
    }

    #[test]
    fn test_resolve_type_precedence() {
        let credit = Some(TransactionType::Credit);
        let debit = Some(TransactionType::Debit);
        // Type column beats everything
        assert_eq!(resolve_type(Some("DR"), "Salary March", credit), TransactionType::Debit);
        assert_eq!(resolve_type(Some("Credit"), "Swiggy", debit), TransactionType::Credit);
        // Keyword beats the amount marker
        assert_eq!(resolve_type(None, "SALARY MARCH", debit), TransactionType::Credit);
        assert_eq!(resolve_type(Some(""), "Refund from Myntra", None), TransactionType::Credit);
        // Amount marker
        assert_eq!(resolve_type(None, "NEFT 1234", credit), TransactionType::Credit);
        assert_eq!(resolve_type(None, "NEFT 1234", debit), TransactionType::Debit);
        // Default
        assert_eq!(resolve_type(None, "Swiggy Order", None), TransactionType::Debit);
        assert_eq!(resolve_type(Some("pending"), "Swiggy Order", None), TransactionType::Debit);
    }

    #[test]
    fn test_type_from_cell() {
        assert_eq!(type_from_cell(" cr "), Some(TransactionType::Credit));
        assert_eq!(type_from_cell("Debit Card"), Some(TransactionType::Debit));
        assert_eq!(type_from_cell("crd"), None);
    }

    #[test]
    fn test_impulse_and_mood_cells() {
        assert_eq!(impulse_from_cell("Yes"), Some(true));
        assert_eq!(impulse_from_cell("false"), Some(false));
        assert_eq!(impulse_from_cell(""), None);
        assert_eq!(mood_from_cell("Stressed"), Some(Mood::Stressed));
        assert_eq!(mood_from_cell("Not tracked"), None);
    }
}
