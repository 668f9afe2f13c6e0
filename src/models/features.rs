use serde::{Deserialize, Serialize};

/// Number of features the engine works with
pub const FEATURE_COUNT: usize = 6;

/// Request keys in feature-vector order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "math_score",
    "science_score",
    "reading_score",
    "learning_style",
    "interest_level",
    "previous_performance",
];

/// Numeric encoding of one recommendation request.
///
/// Scores are conventionally on a 0-100 scale and the categorical fields are
/// small buckets (0, 1, 2), but neither range is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub math_score: f64,
    pub science_score: f64,
    pub reading_score: f64,
    /// 0: visual, 1: auditory, 2: kinesthetic
    pub learning_style: i64,
    /// 0: low, 1: medium, 2: high
    pub interest_level: i64,
    /// 0: below average, 1: average, 2: above average
    pub previous_performance: i64,
}

impl FeatureVector {
    /// Fixed-order view used by statistical backends
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.math_score,
            self.science_score,
            self.reading_score,
            self.learning_style as f64,
            self.interest_level as f64,
            self.previous_performance as f64,
        ]
    }
}
