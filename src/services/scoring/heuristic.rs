use crate::models::{CategoryLabel, FeatureVector};

use super::{ScoreVector, Scorer};

const ADVANCED_THRESHOLD: f64 = 85.0;
const INTERMEDIATE_THRESHOLD: f64 = 70.0;
const BASIC_THRESHOLD: f64 = 50.0;

/// Every category starts here so the vector always sums to a positive value
const BASELINE: f64 = 0.05;
const PRIMARY_RULE: f64 = 0.6;
const SECONDARY_RULE: f64 = 0.4;
const FALLBACK_RULE: f64 = 0.5;
/// Per bucket step of interest level or previous performance
const BUCKET_WEIGHT: f64 = 0.05;

/// Rule-based backend.
///
/// Mirrors the thresholds the training data is labelled with. Each rule only
/// ever adds to a category, and the rules feeding `Math_Advanced` and
/// `Science_Advanced` fire on scores reaching a threshold, so raising the math
/// or science score never lowers either of them.
#[derive(Debug, Clone, Default)]
pub struct HeuristicBackend;

impl HeuristicBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Scorer for HeuristicBackend {
    fn score(&self, features: &FeatureVector) -> ScoreVector {
        use CategoryLabel::*;

        let math = features.math_score;
        let science = features.science_score;
        let reading = features.reading_score;
        let performance = bucket(features.previous_performance);
        let interest = bucket(features.interest_level);

        let mut scores = [BASELINE; 9];
        let mut add = |label: CategoryLabel, amount: f64| {
            scores[index(label)] += amount;
        };

        let mut matched = false;

        if math >= ADVANCED_THRESHOLD && science >= ADVANCED_THRESHOLD {
            add(MathAdvanced, PRIMARY_RULE);
            add(ScienceAdvanced, PRIMARY_RULE);
            matched = true;
        }
        if (INTERMEDIATE_THRESHOLD..ADVANCED_THRESHOLD).contains(&math)
            && science >= INTERMEDIATE_THRESHOLD
        {
            add(MathIntermediate, FALLBACK_RULE);
            matched = true;
        }
        if science >= ADVANCED_THRESHOLD && math >= INTERMEDIATE_THRESHOLD {
            add(ScienceAdvanced, SECONDARY_RULE);
            matched = true;
        }
        if (INTERMEDIATE_THRESHOLD..ADVANCED_THRESHOLD).contains(&science)
            && math >= INTERMEDIATE_THRESHOLD
        {
            add(ScienceIntermediate, FALLBACK_RULE);
            matched = true;
        }
        if reading >= ADVANCED_THRESHOLD && math < INTERMEDIATE_THRESHOLD {
            add(LanguageAdvanced, PRIMARY_RULE);
            matched = true;
        }
        if (INTERMEDIATE_THRESHOLD..ADVANCED_THRESHOLD).contains(&reading)
            && math < INTERMEDIATE_THRESHOLD
        {
            add(LanguageIntermediate, FALLBACK_RULE);
            matched = true;
        }
        if !matched {
            add(GeneralStudies, FALLBACK_RULE);
        }

        if math < BASIC_THRESHOLD {
            add(MathBasic, SECONDARY_RULE);
        }
        if science < BASIC_THRESHOLD {
            add(ScienceBasic, SECONDARY_RULE);
        }

        // Strong past performance leans towards advanced material, weak
        // performance towards the basics.
        for label in [MathAdvanced, ScienceAdvanced, LanguageAdvanced] {
            add(label, BUCKET_WEIGHT * performance);
        }
        for label in [MathBasic, ScienceBasic] {
            add(label, BUCKET_WEIGHT * (2.0 - performance));
        }
        add(GeneralStudies, BUCKET_WEIGHT * (2.0 - interest));

        ScoreVector::from_entries(CategoryLabel::ALL.into_iter().zip(scores))
    }

    fn categories(&self) -> Vec<CategoryLabel> {
        CategoryLabel::ALL.to_vec()
    }
}

fn index(label: CategoryLabel) -> usize {
    CategoryLabel::ALL
        .iter()
        .position(|candidate| *candidate == label)
        .unwrap_or_default()
}

// Buckets are conventionally 0..=2; anything outside is clamped for scoring
fn bucket(value: i64) -> f64 {
    value.clamp(0, 2) as f64
}
