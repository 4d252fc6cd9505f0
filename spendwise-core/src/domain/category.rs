//! Spending categories

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Transaction category
///
/// The fixed set mirrors the category picker; anything else typed by hand
/// (or found in an imported file) is kept verbatim as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    FoodAndDining,
    Shopping,
    TravelAndTransport,
    BillsAndUtilities,
    Entertainment,
    Healthcare,
    Education,
    Emergency,
    Investment,
    Other,
    Custom(String),
}

impl Category {
    /// The fixed categories, in declared order
    pub const ALL: [Category; 10] = [
        Category::FoodAndDining,
        Category::Shopping,
        Category::TravelAndTransport,
        Category::BillsAndUtilities,
        Category::Entertainment,
        Category::Healthcare,
        Category::Education,
        Category::Emergency,
        Category::Investment,
        Category::Other,
    ];

    /// Display label, also used as the serialized form
    pub fn label(&self) -> &str {
        match self {
            Category::FoodAndDining => "Food & Dining",
            Category::Shopping => "Shopping",
            Category::TravelAndTransport => "Travel & Transport",
            Category::BillsAndUtilities => "Bills & Utilities",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Emergency => "Emergency",
            Category::Investment => "Investment",
            Category::Other => "Other",
            Category::Custom(label) => label,
        }
    }

    /// True for categories outside the fixed set
    pub fn is_custom(&self) -> bool {
        matches!(self, Category::Custom(_))
    }

    /// Resolve a label case-insensitively; blank input maps to `Other`
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Category::Other;
        }
        Self::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| Category::Custom(trimmed.to_string()))
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for category in Category::ALL.iter() {
            assert_eq!(&Category::from_label(category.label()), category);
        }
    }

    #[test]
    fn test_case_insensitive_and_custom() {
        assert_eq!(Category::from_label("food & dining"), Category::FoodAndDining);
        assert_eq!(Category::from_label("  "), Category::Other);
        assert_eq!(
            Category::from_label("Pets"),
            Category::Custom("Pets".to_string())
        );
        assert!(Category::from_label("Pets").is_custom());
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&Category::TravelAndTransport).unwrap();
        assert_eq!(json, "\"Travel & Transport\"");

        let parsed: Category = serde_json::from_str("\"Bills & Utilities\"").unwrap();
        assert_eq!(parsed, Category::BillsAndUtilities);
    }
}
