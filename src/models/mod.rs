use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

pub mod analytics;
pub mod category;
pub mod features;
pub mod resource;

pub use analytics::{
    AnalyticsRecord, AnalyticsSummary, CategoryCount, TimeOfDayCounts, TrackEventRequest,
};
pub use category::{CategoryLabel, UnknownCategory};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use resource::{Difficulty, Extent, Recommendation, ResourceDescriptor, ResourceType};

// ============================================================================
// Engine Output Types
// ============================================================================

/// Ranked output of one recommendation request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationResult {
    /// Resources ordered by confidence, highest first
    pub recommendations: Vec<Recommendation>,
    /// Selected categories, best first
    pub predicted_categories: Vec<CategoryLabel>,
    /// Score of each predicted category, aligned with `predicted_categories`
    pub probabilities: Vec<f64>,
}

/// Which scoring backend implementation is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendVariant {
    Trained,
    Heuristic,
    Mock,
}

impl BackendVariant {
    pub fn name(&self) -> &'static str {
        match self {
            BackendVariant::Trained => "trained",
            BackendVariant::Heuristic => "heuristic",
            BackendVariant::Mock => "mock",
        }
    }

    /// True when scores carry no real discriminative signal
    pub fn is_degraded(&self) -> bool {
        matches!(self, BackendVariant::Mock)
    }
}

/// Diagnostic description of the active scoring backend
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BackendInfo {
    pub variant_name: BackendVariant,
    pub degraded: bool,
    pub category_set: Vec<CategoryLabel>,
    pub n_classes: usize,
    pub feature_names: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReloadOutcome {
    pub variant_name: BackendVariant,
}

/// Summary of a training run
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrainingReport {
    pub samples: usize,
    pub holdout_accuracy: f64,
    pub classes: Vec<CategoryLabel>,
    pub artifact_path: PathBuf,
    pub variant_name: BackendVariant,
}
