use crate::models::{CategoryLabel, FeatureVector};

use super::{ScoreVector, Scorer};

/// Canned scores, independent of the request
const CANNED_SCORES: [(CategoryLabel, f64); 3] = [
    (CategoryLabel::MathAdvanced, 0.6),
    (CategoryLabel::ScienceIntermediate, 0.25),
    (CategoryLabel::GeneralStudies, 0.15),
];

/// Degraded backend installed when neither the trained nor the heuristic
/// backend can be built. It carries no signal from the request.
#[derive(Debug, Clone, Default)]
pub struct MockBackend;

impl MockBackend {
    pub fn new() -> Self {
        tracing::warn!(
            "Mock scoring backend installed; recommendations ignore the request"
        );
        Self
    }
}

impl Scorer for MockBackend {
    fn score(&self, _features: &FeatureVector) -> ScoreVector {
        ScoreVector::from_entries(CANNED_SCORES)
    }

    fn categories(&self) -> Vec<CategoryLabel> {
        CANNED_SCORES.iter().map(|(label, _)| *label).collect()
    }
}
