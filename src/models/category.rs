use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Learning-resource category a student can be steered towards.
///
/// The declaration order is the canonical enumeration order. Backends that
/// expose every label enumerate them in this order, and it is the order
/// that breaks ties between equally scored categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryLabel {
    #[serde(rename = "Math_Basic")]
    MathBasic,
    #[serde(rename = "Math_Intermediate")]
    MathIntermediate,
    #[serde(rename = "Math_Advanced")]
    MathAdvanced,
    #[serde(rename = "Science_Basic")]
    ScienceBasic,
    #[serde(rename = "Science_Intermediate")]
    ScienceIntermediate,
    #[serde(rename = "Science_Advanced")]
    ScienceAdvanced,
    #[serde(rename = "Language_Intermediate")]
    LanguageIntermediate,
    #[serde(rename = "Language_Advanced")]
    LanguageAdvanced,
    #[serde(rename = "General_Studies")]
    GeneralStudies,
}

impl CategoryLabel {
    /// Every label, in canonical order
    pub const ALL: [CategoryLabel; 9] = [
        CategoryLabel::MathBasic,
        CategoryLabel::MathIntermediate,
        CategoryLabel::MathAdvanced,
        CategoryLabel::ScienceBasic,
        CategoryLabel::ScienceIntermediate,
        CategoryLabel::ScienceAdvanced,
        CategoryLabel::LanguageIntermediate,
        CategoryLabel::LanguageAdvanced,
        CategoryLabel::GeneralStudies,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLabel::MathBasic => "Math_Basic",
            CategoryLabel::MathIntermediate => "Math_Intermediate",
            CategoryLabel::MathAdvanced => "Math_Advanced",
            CategoryLabel::ScienceBasic => "Science_Basic",
            CategoryLabel::ScienceIntermediate => "Science_Intermediate",
            CategoryLabel::ScienceAdvanced => "Science_Advanced",
            CategoryLabel::LanguageIntermediate => "Language_Intermediate",
            CategoryLabel::LanguageAdvanced => "Language_Advanced",
            CategoryLabel::GeneralStudies => "General_Studies",
        }
    }
}

impl Display for CategoryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the canonical labels
#[derive(Debug, thiserror::Error)]
#[error("unknown category label: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for CategoryLabel {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_distinct() {
        let mut names: Vec<&str> = CategoryLabel::ALL.iter().map(|l| l.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&CategoryLabel::LanguageAdvanced).unwrap();
        assert_eq!(json, r#""Language_Advanced""#);

        let parsed: CategoryLabel = serde_json::from_str(r#""General_Studies""#).unwrap();
        assert_eq!(parsed, CategoryLabel::GeneralStudies);
    }

    #[test]
    fn test_from_str_round_trips_display() {
        for label in CategoryLabel::ALL {
            assert_eq!(label.to_string().parse::<CategoryLabel>().unwrap(), label);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "Art_Basic".parse::<CategoryLabel>().unwrap_err();
        assert_eq!(err.to_string(), "unknown category label: Art_Basic");
    }
}
