use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CategoryLabel, FeatureVector, FEATURE_COUNT};

use super::{BackendError, ScoreVector, Scorer};

/// Per-feature standardization fitted on training data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; FEATURE_COUNT],
    pub scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    /// Fits mean and population standard deviation per feature.
    /// Constant features get a scale of 1.
    pub fn fit(rows: &[[f64; FEATURE_COUNT]]) -> Self {
        let mut mean = [0.0; FEATURE_COUNT];
        let mut scale = [1.0; FEATURE_COUNT];
        if rows.is_empty() {
            return Self { mean, scale };
        }

        let n = rows.len() as f64;
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x / n;
            }
        }
        for (j, s) in scale.iter_mut().enumerate() {
            let variance = rows.iter().map(|row| (row[j] - mean[j]).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();
            *s = if std > f64::EPSILON { std } else { 1.0 };
        }

        Self { mean, scale }
    }

    pub fn transform(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for j in 0..FEATURE_COUNT {
            let scale = if self.scale[j] == 0.0 { 1.0 } else { self.scale[j] };
            out[j] = (row[j] - self.mean[j]) / scale;
        }
        out
    }
}

/// Serialized form of a fitted classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    /// Class labels in the classifier's native order
    pub classes: Vec<CategoryLabel>,
    pub scaler: StandardScaler,
    /// One weight row per class, aligned with `classes`
    pub weights: Vec<[f64; FEATURE_COUNT]>,
    pub intercepts: Vec<f64>,
    pub trained_at: DateTime<Utc>,
}

impl ModelArtifact {
    pub fn validate(&self) -> Result<(), BackendError> {
        if self.classes.is_empty() {
            return Err(BackendError::InvalidArtifact("no classes".to_string()));
        }
        if self.weights.len() != self.classes.len() || self.intercepts.len() != self.classes.len() {
            return Err(BackendError::InvalidArtifact(format!(
                "{} classes but {} weight rows and {} intercepts",
                self.classes.len(),
                self.weights.len(),
                self.intercepts.len()
            )));
        }
        for (i, label) in self.classes.iter().enumerate() {
            if self.classes[..i].contains(label) {
                return Err(BackendError::InvalidArtifact(format!(
                    "duplicate class {label}"
                )));
            }
        }

        let all_finite = self
            .weights
            .iter()
            .flatten()
            .chain(&self.intercepts)
            .chain(&self.scaler.mean)
            .chain(&self.scaler.scale)
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(BackendError::InvalidArtifact(
                "non-finite parameter".to_string(),
            ));
        }

        Ok(())
    }
}

/// Backend wrapping a fitted scaler and softmax classifier
#[derive(Debug, Clone)]
pub struct TrainedBackend {
    artifact: ModelArtifact,
}

impl TrainedBackend {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, BackendError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    pub fn model_type(&self) -> &str {
        &self.artifact.model_type
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.artifact.trained_at
    }

    /// Class probabilities for already standardized features
    pub fn predict_proba_scaled(&self, scaled: &[f64; FEATURE_COUNT]) -> Vec<f64> {
        let logits: Vec<f64> = self
            .artifact
            .weights
            .iter()
            .zip(&self.artifact.intercepts)
            .map(|(row, bias)| row.iter().zip(scaled).map(|(w, x)| w * x).sum::<f64>() + bias)
            .collect();
        softmax(&logits)
    }
}

impl Scorer for TrainedBackend {
    fn score(&self, features: &FeatureVector) -> ScoreVector {
        let scaled = self.artifact.scaler.transform(&features.to_array());
        let probabilities = self.predict_proba_scaled(&scaled);
        ScoreVector::from_entries(self.artifact.classes.iter().copied().zip(probabilities))
    }

    fn categories(&self) -> Vec<CategoryLabel> {
        self.artifact.classes.clone()
    }
}

pub(crate) fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    if total > 0.0 && total.is_finite() {
        exps.iter().map(|e| e / total).collect()
    } else {
        vec![1.0 / logits.len() as f64; logits.len()]
    }
}
