//! Scoring backends
//!
//! A scoring backend turns a feature vector into one score per category.
//! There are exactly three implementations, chosen once by the fallback
//! chain in [`loader`]: a trained classifier, a rule-based heuristic and a
//! canned mock used only when nothing better can be built.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{BackendInfo, BackendVariant, CategoryLabel, FeatureVector, FEATURE_NAMES};

pub mod heuristic;
pub mod loader;
pub mod mock;
pub mod trained;

pub use heuristic::HeuristicBackend;
pub use loader::{BackendLoader, FileModelSource, ModelSource};
pub use mock::MockBackend;
pub use trained::{ModelArtifact, StandardScaler, TrainedBackend};

/// Reasons a backend variant could not be constructed.
///
/// Only ever seen while walking the fallback chain; the chain always ends
/// at the mock variant, so these never reach a caller.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no model artifact at {0}")]
    ArtifactMissing(PathBuf),
    #[error("model artifact could not be read: {0}")]
    ArtifactUnreadable(String),
    #[error("model artifact is invalid: {0}")]
    InvalidArtifact(String),
    #[error("no model artifact source configured")]
    NotConfigured,
    #[error("heuristic backend is disabled")]
    HeuristicDisabled,
}

/// Per-category scores in the backend's native category order.
///
/// Scores are non-negative ranking keys and need not sum to 1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreVector {
    entries: Vec<(CategoryLabel, f64)>,
}

impl ScoreVector {
    /// Builds a score vector, keeping the first score for a repeated label.
    /// Negative and NaN scores are floored to zero.
    pub fn from_entries(entries: impl IntoIterator<Item = (CategoryLabel, f64)>) -> Self {
        let mut kept: Vec<(CategoryLabel, f64)> = Vec::new();
        for (label, score) in entries {
            if kept.iter().any(|(existing, _)| *existing == label) {
                continue;
            }
            kept.push((label, score.max(0.0)));
        }
        Self { entries: kept }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryLabel, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: CategoryLabel) -> Option<f64> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == label)
            .map(|(_, score)| *score)
    }

    pub fn labels(&self) -> Vec<CategoryLabel> {
        self.entries.iter().map(|(label, _)| *label).collect()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, score)| score).sum()
    }
}

/// Capability shared by every backend variant
pub trait Scorer {
    /// Scores every category the backend knows about
    fn score(&self, features: &FeatureVector) -> ScoreVector;

    /// Categories the backend can emit, in native order
    fn categories(&self) -> Vec<CategoryLabel>;
}

/// The active scoring backend.
///
/// Immutable once built. Reloading builds a new value and swaps it in.
#[derive(Debug, Clone)]
pub enum ScoringBackend {
    Trained(TrainedBackend),
    Heuristic(HeuristicBackend),
    Mock(MockBackend),
}

impl ScoringBackend {
    pub fn variant(&self) -> BackendVariant {
        match self {
            ScoringBackend::Trained(_) => BackendVariant::Trained,
            ScoringBackend::Heuristic(_) => BackendVariant::Heuristic,
            ScoringBackend::Mock(_) => BackendVariant::Mock,
        }
    }

    pub fn describe(&self) -> BackendInfo {
        let variant = self.variant();
        let category_set = self.categories();
        let (model_type, trained_at) = match self {
            ScoringBackend::Trained(backend) => {
                (Some(backend.model_type().to_string()), Some(backend.trained_at()))
            }
            _ => (None, None),
        };

        BackendInfo {
            variant_name: variant,
            degraded: variant.is_degraded(),
            n_classes: category_set.len(),
            category_set,
            feature_names: FEATURE_NAMES.to_vec(),
            model_type,
            trained_at,
        }
    }
}

impl Scorer for ScoringBackend {
    fn score(&self, features: &FeatureVector) -> ScoreVector {
        match self {
            ScoringBackend::Trained(backend) => backend.score(features),
            ScoringBackend::Heuristic(backend) => backend.score(features),
            ScoringBackend::Mock(backend) => backend.score(features),
        }
    }

    fn categories(&self) -> Vec<CategoryLabel> {
        match self {
            ScoringBackend::Trained(backend) => backend.categories(),
            ScoringBackend::Heuristic(backend) => backend.categories(),
            ScoringBackend::Mock(backend) => backend.categories(),
        }
    }
}
