//! Categorical lookup table.
//!
//! The table is global: a token means the same code whichever field it
//! appears in. Tokens match exactly, with no case folding.

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

/// Code assigned to a categorical value that is not in the table.
pub const LENIENT_FALLBACK_CODE: f64 = 0.0;

/// Minimum similarity for a fallback notice to carry a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Known categorical tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalToken {
    Normal,
    Abnormal,
    Present,
    NotPresent,
    Yes,
    No,
    Poor,
    Good,
}

impl CategoricalToken {
    pub const ALL: [CategoricalToken; 8] = [
        CategoricalToken::Normal,
        CategoricalToken::Abnormal,
        CategoricalToken::Present,
        CategoricalToken::NotPresent,
        CategoricalToken::Yes,
        CategoricalToken::No,
        CategoricalToken::Poor,
        CategoricalToken::Good,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(CategoricalToken::Normal),
            "abnormal" => Some(CategoricalToken::Abnormal),
            "present" => Some(CategoricalToken::Present),
            "notpresent" => Some(CategoricalToken::NotPresent),
            "yes" => Some(CategoricalToken::Yes),
            "no" => Some(CategoricalToken::No),
            "poor" => Some(CategoricalToken::Poor),
            "good" => Some(CategoricalToken::Good),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoricalToken::Normal => "normal",
            CategoricalToken::Abnormal => "abnormal",
            CategoricalToken::Present => "present",
            CategoricalToken::NotPresent => "notpresent",
            CategoricalToken::Yes => "yes",
            CategoricalToken::No => "no",
            CategoricalToken::Poor => "poor",
            CategoricalToken::Good => "good",
        }
    }

    /// Numeric code fed to the model.
    pub fn code(&self) -> f64 {
        match self {
            CategoricalToken::Normal
            | CategoricalToken::Present
            | CategoricalToken::Yes
            | CategoricalToken::Poor => 1.0,
            CategoricalToken::Abnormal
            | CategoricalToken::NotPresent
            | CategoricalToken::No
            | CategoricalToken::Good => 0.0,
        }
    }
}

/// What to do with a categorical value that is not in the table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategoricalPolicy {
    /// Encode as [`LENIENT_FALLBACK_CODE`] and record a fallback notice
    #[default]
    Lenient,
    /// Mark the field as unencodable, which aborts the assessment
    Strict,
}

/// Closest allowed option to an unknown value, if any is reasonably close.
pub fn suggest_option(value: &str, options: &[&'static str]) -> Option<&'static str> {
    let lower = value.trim().to_lowercase();
    options
        .iter()
        .map(|option| (*option, jaro_winkler(&lower, option)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(option, _)| option)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_codes() {
        let expected = [
            ("normal", 1.0),
            ("abnormal", 0.0),
            ("present", 1.0),
            ("notpresent", 0.0),
            ("yes", 1.0),
            ("no", 0.0),
            ("poor", 1.0),
            ("good", 0.0),
        ];
        for (text, code) in expected {
            assert_eq!(CategoricalToken::parse(text).unwrap().code(), code, "{}", text);
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for token in CategoricalToken::ALL {
            assert_eq!(CategoricalToken::parse(token.as_str()), Some(token));
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(CategoricalToken::parse("Yes"), None);
        assert_eq!(CategoricalToken::parse(" yes"), None);
        assert_eq!(CategoricalToken::parse("not present"), None);
    }

    #[test]
    fn test_suggest_option() {
        assert_eq!(suggest_option("Yes", &["no", "yes"]), Some("yes"));
        assert_eq!(
            suggest_option("not present", &["notpresent", "present"]),
            Some("notpresent")
        );
        assert_eq!(suggest_option("xyzzy", &["normal", "abnormal"]), None);
    }
}
