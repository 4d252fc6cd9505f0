//! Mood tags for debit transactions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Emotional state recorded alongside a purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Excited,
    Bored,
    Stressed,
    Sad,
    Anxious,
    Confident,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Excited,
        Mood::Bored,
        Mood::Stressed,
        Mood::Sad,
        Mood::Anxious,
        Mood::Confident,
        Mood::Neutral,
    ];

    /// Capitalized label for display
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Excited => "Excited",
            Mood::Bored => "Bored",
            Mood::Stressed => "Stressed",
            Mood::Sad => "Sad",
            Mood::Anxious => "Anxious",
            Mood::Confident => "Confident",
            Mood::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .find(|m| m.label().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| format!("Unknown mood: {}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("STRESSED".parse::<Mood>().unwrap(), Mood::Stressed);
        assert_eq!(" happy ".parse::<Mood>().unwrap(), Mood::Happy);
        assert!("Not tracked".parse::<Mood>().is_err());
    }

    #[test]
    fn test_serialized_lowercase() {
        assert_eq!(serde_json::to_string(&Mood::Anxious).unwrap(), "\"anxious\"");
    }
}
