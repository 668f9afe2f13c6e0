//! Fits the trained scoring backend on synthetic student data.
//!
//! Students are generated with a fixed seed and labelled with the same
//! threshold rules the heuristic backend encodes, then a standard scaler and
//! a multinomial logistic regression are fitted by full-batch gradient
//! descent. The result is written as a JSON [`ModelArtifact`].

use std::path::Path;

use chrono::Utc;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{
    error::{AppError, AppResult},
    models::{CategoryLabel, FeatureVector, FEATURE_COUNT},
    services::scoring::{trained::softmax, ModelArtifact, Scorer, StandardScaler, TrainedBackend},
};

pub const MODEL_TYPE: &str = "SoftmaxRegression";

/// Training hyperparameters
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub samples: usize,
    pub seed: u64,
    pub epochs: usize,
    pub learning_rate: f64,
    pub l2_penalty: f64,
    pub holdout_fraction: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            samples: 2000,
            seed: 42,
            epochs: 300,
            learning_rate: 0.5,
            l2_penalty: 1e-3,
            holdout_fraction: 0.2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LabeledSample {
    pub features: FeatureVector,
    pub category: CategoryLabel,
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub samples: usize,
    pub holdout_accuracy: f64,
}

/// Category a synthetic student is labelled with; first matching rule wins
pub fn label_for(features: &FeatureVector) -> CategoryLabel {
    let math = features.math_score;
    let science = features.science_score;
    let reading = features.reading_score;

    if math >= 85.0 && science >= 85.0 {
        CategoryLabel::MathAdvanced
    } else if (70.0..85.0).contains(&math) && science >= 70.0 {
        CategoryLabel::MathIntermediate
    } else if science >= 85.0 && math >= 70.0 {
        CategoryLabel::ScienceAdvanced
    } else if (70.0..85.0).contains(&science) && math >= 70.0 {
        CategoryLabel::ScienceIntermediate
    } else if reading >= 85.0 && math < 70.0 {
        CategoryLabel::LanguageAdvanced
    } else if (70.0..85.0).contains(&reading) && math < 70.0 {
        CategoryLabel::LanguageIntermediate
    } else {
        CategoryLabel::GeneralStudies
    }
}

/// Generates labelled students with scores in 40..100 and buckets in 0..=2
pub fn generate_synthetic_data(samples: usize, seed: u64) -> Vec<LabeledSample> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..samples)
        .map(|_| {
            let features = FeatureVector {
                math_score: rng.gen_range(40..100) as f64,
                science_score: rng.gen_range(40..100) as f64,
                reading_score: rng.gen_range(40..100) as f64,
                learning_style: rng.gen_range(0..=2),
                interest_level: rng.gen_range(0..=2),
                previous_performance: rng.gen_range(0..=2),
            };
            LabeledSample {
                category: label_for(&features),
                features,
            }
        })
        .collect()
}

/// Generates data, fits the model and measures holdout accuracy
pub fn train(config: &TrainingConfig) -> AppResult<TrainingOutcome> {
    let mut data = generate_synthetic_data(config.samples, config.seed);
    if data.is_empty() {
        return Err(AppError::InvalidInput(
            "training needs at least one sample".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    data.shuffle(&mut rng);

    let holdout = ((data.len() as f64) * config.holdout_fraction).round() as usize;
    let holdout = holdout.min(data.len() - 1);
    let (test, fit) = data.split_at(holdout);

    // Classes are kept in lexical order of their labels
    let mut classes: Vec<CategoryLabel> = Vec::new();
    for sample in fit {
        if !classes.contains(&sample.category) {
            classes.push(sample.category);
        }
    }
    classes.sort_by_key(|label| label.as_str());

    let rows: Vec<[f64; FEATURE_COUNT]> = fit.iter().map(|s| s.features.to_array()).collect();
    let scaler = StandardScaler::fit(&rows);
    let scaled: Vec<[f64; FEATURE_COUNT]> = rows.iter().map(|row| scaler.transform(row)).collect();
    let targets: Vec<usize> = fit
        .iter()
        .map(|s| classes.iter().position(|c| *c == s.category).unwrap_or_default())
        .collect();

    let (weights, intercepts) = fit_softmax_regression(&scaled, &targets, classes.len(), config);

    let artifact = ModelArtifact {
        model_type: MODEL_TYPE.to_string(),
        classes,
        scaler,
        weights,
        intercepts,
        trained_at: Utc::now(),
    };

    let holdout_accuracy = accuracy(&artifact, test)?;
    tracing::info!(
        samples = data.len(),
        holdout = test.len(),
        accuracy = holdout_accuracy,
        "Model training finished"
    );

    Ok(TrainingOutcome {
        artifact,
        samples: data.len(),
        holdout_accuracy,
    })
}

fn fit_softmax_regression(
    x: &[[f64; FEATURE_COUNT]],
    y: &[usize],
    n_classes: usize,
    config: &TrainingConfig,
) -> (Vec<[f64; FEATURE_COUNT]>, Vec<f64>) {
    let mut weights = vec![[0.0; FEATURE_COUNT]; n_classes];
    let mut intercepts = vec![0.0; n_classes];
    let n = x.len() as f64;

    for _ in 0..config.epochs {
        let mut grad_w = vec![[0.0; FEATURE_COUNT]; n_classes];
        let mut grad_b = vec![0.0; n_classes];

        for (row, &target) in x.iter().zip(y) {
            let logits: Vec<f64> = weights
                .iter()
                .zip(&intercepts)
                .map(|(w, b)| w.iter().zip(row).map(|(wj, xj)| wj * xj).sum::<f64>() + b)
                .collect();
            let probs = softmax(&logits);

            for k in 0..n_classes {
                let err = probs[k] - if k == target { 1.0 } else { 0.0 };
                grad_b[k] += err;
                for j in 0..FEATURE_COUNT {
                    grad_w[k][j] += err * row[j];
                }
            }
        }

        for k in 0..n_classes {
            intercepts[k] -= config.learning_rate * grad_b[k] / n;
            for j in 0..FEATURE_COUNT {
                let gradient = grad_w[k][j] / n + config.l2_penalty * weights[k][j];
                weights[k][j] -= config.learning_rate * gradient;
            }
        }
    }

    (weights, intercepts)
}

fn accuracy(artifact: &ModelArtifact, samples: &[LabeledSample]) -> AppResult<f64> {
    if samples.is_empty() {
        return Ok(0.0);
    }
    let backend = TrainedBackend::from_artifact(artifact.clone())
        .map_err(|e| AppError::Artifact(e.to_string()))?;

    let correct = samples
        .iter()
        .filter(|sample| {
            let scores = backend.score(&sample.features);
            let mut best: Option<(CategoryLabel, f64)> = None;
            for (label, score) in scores.iter() {
                if best.map_or(true, |(_, top)| score > top) {
                    best = Some((label, score));
                }
            }
            best.map(|(label, _)| label) == Some(sample.category)
        })
        .count();

    Ok(correct as f64 / samples.len() as f64)
}

/// Writes the artifact as JSON, replacing any previous file atomically
pub fn write_artifact(path: &Path, artifact: &ModelArtifact) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let staging = path.with_extension("json.tmp");
    std::fs::write(&staging, serde_json::to_vec_pretty(artifact)?)?;
    std::fs::rename(&staging, path)?;
    Ok(())
}
