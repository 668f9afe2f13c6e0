use std::{
    path::PathBuf,
    sync::{Arc, Mutex, RwLock},
};

use serde_json::Value;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{BackendInfo, FeatureVector, RecommendationResult, ReloadOutcome, TrainingReport},
    services::{
        assembler::{assemble, MAX_RECOMMENDATIONS},
        catalog::Catalog,
        features,
        scoring::{BackendLoader, Scorer, ScoringBackend},
        selector::{select_top, TOP_CATEGORIES},
        training::{self, TrainingConfig},
    },
};

/// Runs the scoring pipeline against a snapshot of backend and catalog.
///
/// Feature vector → scores → top categories → ranked resources. Pure; the
/// same inputs always give the same output.
pub fn recommend_with(
    backend: &ScoringBackend,
    catalog: &Catalog,
    features: &FeatureVector,
) -> RecommendationResult {
    let scores = backend.score(features);
    let selected = select_top(&scores, TOP_CATEGORIES);
    let recommendations = assemble(&selected, catalog, MAX_RECOMMENDATIONS);

    let (predicted_categories, probabilities) = selected.into_iter().unzip();
    RecommendationResult {
        recommendations,
        predicted_categories,
        probabilities,
    }
}

/// Recommendation engine shared by all requests.
///
/// The active backend sits behind a copy-on-write cell: requests clone the
/// current `Arc` and score against it, while reloads build a complete new
/// backend before swapping the pointer. A request that started before a
/// reload finishes on the backend it picked up.
pub struct RecommendationEngine {
    backend: RwLock<Arc<ScoringBackend>>,
    loader: BackendLoader,
    catalog: Arc<Catalog>,
    artifact_path: Option<PathBuf>,
    // Serializes reload and train so only one writer builds at a time
    writer: Mutex<()>,
}

impl RecommendationEngine {
    /// Creates the engine and builds its first backend via the fallback chain
    pub fn new(loader: BackendLoader, catalog: Arc<Catalog>, artifact_path: Option<PathBuf>) -> Self {
        let backend = loader.build();
        Self {
            backend: RwLock::new(Arc::new(backend)),
            loader,
            catalog,
            artifact_path,
            writer: Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            BackendLoader::from_config(config),
            Catalog::reference(),
            config.model_path.clone(),
        )
    }

    /// Snapshot of the active backend
    pub fn backend(&self) -> Arc<ScoringBackend> {
        self.backend
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Recommends resources for a raw JSON request body
    pub fn recommend(&self, request: &Value) -> AppResult<RecommendationResult> {
        let features = features::extract_value(request)?;
        Ok(self.recommend_features(&features))
    }

    pub fn recommend_features(&self, features: &FeatureVector) -> RecommendationResult {
        let backend = self.backend();
        recommend_with(&backend, &self.catalog, features)
    }

    pub fn describe_backend(&self) -> BackendInfo {
        self.backend().describe()
    }

    /// Rebuilds the backend through the fallback chain and publishes it.
    ///
    /// Never fails; if nothing better can be built the mock backend is
    /// installed. Blocks on artifact I/O, so async callers should run it on
    /// a blocking thread.
    pub fn reload(&self) -> ReloadOutcome {
        let _writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.rebuild()
    }

    /// Fits a new model, writes its artifact and reloads.
    ///
    /// CPU-bound; async callers should run it on a blocking thread.
    pub fn train(&self, config: &TrainingConfig) -> AppResult<TrainingReport> {
        let path = self.artifact_path.clone().ok_or_else(|| {
            AppError::NotConfigured("no model artifact path configured".to_string())
        })?;

        let _writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let outcome = training::train(config)?;
        training::write_artifact(&path, &outcome.artifact)?;
        tracing::info!(path = %path.display(), "Model artifact written");

        let reloaded = self.rebuild();

        Ok(TrainingReport {
            samples: outcome.samples,
            holdout_accuracy: outcome.holdout_accuracy,
            classes: outcome.artifact.classes,
            artifact_path: path,
            variant_name: reloaded.variant_name,
        })
    }

    // Caller must hold the writer lock
    fn rebuild(&self) -> ReloadOutcome {
        let previous = self.backend().variant();
        let fresh = Arc::new(self.loader.build());
        let variant_name = fresh.variant();

        *self
            .backend
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = fresh;

        tracing::info!(
            previous = previous.name(),
            current = variant_name.name(),
            "Scoring backend reloaded"
        );
        ReloadOutcome { variant_name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BackendVariant, CategoryLabel};
    use crate::services::scoring::{FileModelSource, ModelSource};
    use serde_json::json;

    fn heuristic_engine() -> RecommendationEngine {
        RecommendationEngine::new(BackendLoader::new(None, true), Catalog::reference(), None)
    }

    fn mock_engine() -> RecommendationEngine {
        RecommendationEngine::new(BackendLoader::new(None, false), Catalog::reference(), None)
    }

    #[test]
    fn test_advanced_student_end_to_end() {
        let engine = heuristic_engine();
        let result = engine
            .recommend(&json!({
                "math_score": 95,
                "science_score": 92,
                "reading_score": 60,
                "learning_style": 0,
                "interest_level": 2,
                "previous_performance": 2
            }))
            .unwrap();

        assert_eq!(result.predicted_categories.len(), 3);
        assert!(result.predicted_categories.contains(&CategoryLabel::MathAdvanced));
        assert!(result.predicted_categories.contains(&CategoryLabel::ScienceAdvanced));

        let leader = result.predicted_categories[0];
        assert!(leader == CategoryLabel::MathAdvanced || leader == CategoryLabel::ScienceAdvanced);
        assert!(result.recommendations[..3].iter().all(|r| r.category == leader));
        assert_eq!(result.recommendations.len(), 9);
    }

    #[test]
    fn test_empty_request_breaks_ties_by_native_order() {
        let result = heuristic_engine().recommend(&json!({})).unwrap();
        assert_eq!(
            result.predicted_categories,
            vec![
                CategoryLabel::GeneralStudies,
                CategoryLabel::MathBasic,
                CategoryLabel::ScienceBasic,
            ]
        );
        assert_eq!(result.probabilities[1], result.probabilities[2]);
        assert_eq!(result.recommendations[3].category, CategoryLabel::MathBasic);
        assert_eq!(result.recommendations[6].category, CategoryLabel::ScienceBasic);
    }

    #[test]
    fn test_repeat_requests_are_identical() {
        let engine = heuristic_engine();
        let request = json!({ "math_score": 72, "science_score": 88, "reading_score": 91 });
        let first = serde_json::to_vec(&engine.recommend(&request).unwrap()).unwrap();
        let second = serde_json::to_vec(&engine.recommend(&request).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_confidence_never_increases() {
        let engine = heuristic_engine();
        let result = engine
            .recommend(&json!({ "math_score": 80, "science_score": 75, "reading_score": 80 }))
            .unwrap();
        for pair in result.recommendations.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_invalid_input_is_reported() {
        let err = heuristic_engine()
            .recommend(&json!({ "math_score": "lots" }))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_mock_backend_returns_canned_result() {
        let engine = mock_engine();
        let info = engine.describe_backend();
        assert_eq!(info.variant_name, BackendVariant::Mock);
        assert!(info.degraded);

        let result = engine.recommend(&json!({ "math_score": 10 })).unwrap();
        assert_eq!(
            result.predicted_categories,
            vec![
                CategoryLabel::MathAdvanced,
                CategoryLabel::ScienceIntermediate,
                CategoryLabel::GeneralStudies,
            ]
        );
        assert_eq!(result.probabilities, vec![0.6, 0.25, 0.15]);
    }

    #[test]
    fn test_reload_is_idempotent() {
        let engine = heuristic_engine();
        let first = engine.reload();
        let second = engine.reload();
        assert_eq!(first, second);
        assert_eq!(first.variant_name, BackendVariant::Heuristic);
    }

    #[test]
    fn test_in_flight_snapshot_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let loader = BackendLoader::new(Some(Arc::new(FileModelSource::new(&path))), true);
        let engine = RecommendationEngine::new(loader, Catalog::reference(), Some(path.clone()));

        let before = engine.backend();
        assert_eq!(before.variant(), BackendVariant::Heuristic);

        let report = engine
            .train(&TrainingConfig {
                samples: 200,
                epochs: 20,
                ..TrainingConfig::default()
            })
            .unwrap();
        assert_eq!(report.variant_name, BackendVariant::Trained);
        assert!(FileModelSource::new(&path).load().is_ok());

        // the old snapshot is untouched and still usable
        assert_eq!(before.variant(), BackendVariant::Heuristic);
        let stale = recommend_with(&before, &Catalog::reference(), &FeatureVector::default());
        assert_eq!(stale.predicted_categories[0], CategoryLabel::GeneralStudies);

        let info = engine.describe_backend();
        assert_eq!(info.variant_name, BackendVariant::Trained);
        assert!(info.model_type.is_some());
        assert!(info
            .category_set
            .iter()
            .all(|label| CategoryLabel::ALL.contains(label)));
    }

    #[test]
    fn test_train_without_path_is_not_configured() {
        let err = heuristic_engine().train(&TrainingConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::NotConfigured(_)));
    }

    #[test]
    fn test_concurrent_reads_during_reload() {
        let engine = Arc::new(heuristic_engine());
        let request = json!({ "math_score": 90, "science_score": 90 });
        let expected = engine.recommend(&request).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let engine = engine.clone();
                let request = request.clone();
                let expected = expected.clone();
                scope.spawn(move || {
                    for _ in 0..50 {
                        assert_eq!(engine.recommend(&request).unwrap(), expected);
                    }
                });
            }
            for _ in 0..10 {
                engine.reload();
            }
        });
    }
}
