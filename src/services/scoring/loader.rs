use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::config::Config;

use super::{
    BackendError, HeuristicBackend, MockBackend, ModelArtifact, ScoringBackend, TrainedBackend,
};

/// Where trained model artifacts come from
#[cfg_attr(test, mockall::automock)]
pub trait ModelSource: Send + Sync {
    /// Loads the most recent artifact
    fn load(&self) -> Result<ModelArtifact, BackendError>;

    /// Human-readable location, for logging
    fn location(&self) -> String;
}

/// Reads a JSON artifact from disk
#[derive(Debug, Clone)]
pub struct FileModelSource {
    path: PathBuf,
}

impl FileModelSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelSource for FileModelSource {
    fn load(&self) -> Result<ModelArtifact, BackendError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => BackendError::ArtifactMissing(self.path.clone()),
            _ => BackendError::ArtifactUnreadable(format!("{}: {}", self.path.display(), e)),
        })?;
        serde_json::from_str(&raw).map_err(|e| BackendError::InvalidArtifact(e.to_string()))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Builds the scoring backend by walking the fallback chain:
/// trained, then heuristic, then mock.
#[derive(Clone)]
pub struct BackendLoader {
    model_source: Option<Arc<dyn ModelSource>>,
    heuristic_enabled: bool,
}

impl BackendLoader {
    pub fn new(model_source: Option<Arc<dyn ModelSource>>, heuristic_enabled: bool) -> Self {
        Self {
            model_source,
            heuristic_enabled,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let model_source = config
            .model_path
            .clone()
            .map(|path| Arc::new(FileModelSource::new(path)) as Arc<dyn ModelSource>);
        Self::new(model_source, config.heuristic_enabled)
    }

    /// Always produces a backend; the worst case is the mock variant
    pub fn build(&self) -> ScoringBackend {
        match self.try_trained() {
            Ok(backend) => {
                tracing::info!(variant = "trained", "Scoring backend ready");
                return backend;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Trained backend unavailable, trying heuristic");
            }
        }

        match self.try_heuristic() {
            Ok(backend) => {
                tracing::info!(variant = "heuristic", "Scoring backend ready");
                return backend;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Heuristic backend unavailable, using mock");
            }
        }

        ScoringBackend::Mock(MockBackend::new())
    }

    fn try_trained(&self) -> Result<ScoringBackend, BackendError> {
        let source = self.model_source.as_ref().ok_or(BackendError::NotConfigured)?;
        tracing::debug!(location = %source.location(), "Loading model artifact");
        let artifact = source.load()?;
        let backend = TrainedBackend::from_artifact(artifact)?;
        Ok(ScoringBackend::Trained(backend))
    }

    fn try_heuristic(&self) -> Result<ScoringBackend, BackendError> {
        if !self.heuristic_enabled {
            return Err(BackendError::HeuristicDisabled);
        }
        Ok(ScoringBackend::Heuristic(HeuristicBackend::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BackendVariant, CategoryLabel};
    use crate::services::scoring::StandardScaler;
    use chrono::Utc;

    fn artifact() -> ModelArtifact {
        ModelArtifact {
            model_type: "SoftmaxRegression".to_string(),
            classes: vec![CategoryLabel::MathAdvanced, CategoryLabel::GeneralStudies],
            scaler: StandardScaler {
                mean: [0.0; 6],
                scale: [1.0; 6],
            },
            weights: vec![[0.0; 6], [0.0; 6]],
            intercepts: vec![0.0, 0.0],
            trained_at: Utc::now(),
        }
    }

    #[test]
    fn test_trained_artifact_wins() {
        let mut source = MockModelSource::new();
        source.expect_location().return_const("memory".to_string());
        source.expect_load().times(1).returning(|| Ok(artifact()));

        let loader = BackendLoader::new(Some(Arc::new(source)), true);
        assert_eq!(loader.build().variant(), BackendVariant::Trained);
    }

    #[test]
    fn test_missing_artifact_falls_back_to_heuristic() {
        let mut source = MockModelSource::new();
        source.expect_location().return_const("memory".to_string());
        source
            .expect_load()
            .returning(|| Err(BackendError::ArtifactMissing(PathBuf::from("models/model.json"))));

        let loader = BackendLoader::new(Some(Arc::new(source)), true);
        assert_eq!(loader.build().variant(), BackendVariant::Heuristic);
    }

    #[test]
    fn test_invalid_artifact_falls_back_to_heuristic() {
        let mut source = MockModelSource::new();
        source.expect_location().return_const("memory".to_string());
        source.expect_load().returning(|| {
            let mut bad = artifact();
            bad.weights.pop();
            Ok(bad)
        });

        let loader = BackendLoader::new(Some(Arc::new(source)), true);
        assert_eq!(loader.build().variant(), BackendVariant::Heuristic);
    }

    #[test]
    fn test_nothing_available_lands_on_mock() {
        let loader = BackendLoader::new(None, false);
        assert_eq!(loader.build().variant(), BackendVariant::Mock);
    }

    #[test]
    fn test_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileModelSource::new(dir.path().join("absent.json"));
        assert!(matches!(source.load(), Err(BackendError::ArtifactMissing(_))));
    }

    #[test]
    fn test_file_source_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not json").unwrap();
        let source = FileModelSource::new(&path);
        assert!(matches!(source.load(), Err(BackendError::InvalidArtifact(_))));
    }

    #[test]
    fn test_file_source_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, serde_json::to_string(&artifact()).unwrap()).unwrap();

        let loader = BackendLoader::new(Some(Arc::new(FileModelSource::new(&path))), true);
        assert_eq!(loader.build().variant(), BackendVariant::Trained);
    }
}
