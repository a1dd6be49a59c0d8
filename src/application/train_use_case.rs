// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Runs the `train` command in order:
//
//   Step 1: Validate X into a FeatureMatrix      (Layer 4 - data)
//   Step 2: Fit the boosted ensemble             (Layer 5 - ml)
//   Step 3: Impurity-based feature importances   (Layer 5 - ml)
//   Step 4: Accuracy on the training rows        (Layer 6 - infra)
//   Step 5: Serialise and base64-encode          (Layer 6 - infra)
//
// Step 4 scores the model on the same rows it learned from. The
// number is optimistic and is reported as such; there is no
// held-out split.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::matrix::FeatureMatrix;
use crate::domain::error::ModelError;
use crate::domain::payload::{TrainPayload, TrainResult};
use crate::domain::traits::ClassifierEngine;
use crate::infra::{checkpoint, metrics::TrainMetrics};
use crate::ml::tree::TreeParams;

// ─── Boosting Configuration ──────────────────────────────────────────────────
// Hyperparameters of one training run. Stored inside every model
// blob so a decoded model knows its own learning rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostConfig {
    /// Number of boosting stages
    pub n_estimators:      usize,
    /// Shrinkage applied to every tree's output
    pub learning_rate:     f64,
    pub max_depth:         usize,
    pub min_samples_split: usize,
    pub min_samples_leaf:  usize,
    /// Seed of the feature-order RNG
    pub random_state:      u64,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            n_estimators:      100,
            learning_rate:     0.1,
            max_depth:         3,
            min_samples_split: 2,
            min_samples_leaf:  1,
            random_state:      42,
        }
    }
}

impl BoostConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidConfig("n_estimators must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ModelError::InvalidConfig(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if self.max_depth == 0 {
            return Err(ModelError::InvalidConfig("max_depth must be at least 1".into()));
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidConfig("min_samples_split must be at least 2".into()));
        }
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidConfig("min_samples_leaf must be at least 1".into()));
        }
        Ok(())
    }

    pub fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth:         self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf:  self.min_samples_leaf,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase<E> {
    engine: E,
}

impl<E: ClassifierEngine> TrainUseCase<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn execute(&self, payload: TrainPayload) -> Result<TrainResult> {
        // ── Step 1: Validate the feature matrix ──────────────────────────────
        let x = FeatureMatrix::from_rows(&payload.x).context("invalid X")?;
        tracing::info!("Training on {} rows × {} features", x.n_rows(), x.n_features());

        // ── Step 2: Fit ──────────────────────────────────────────────────────
        let model = self.engine.fit(&x, &payload.y).context("training failed")?;

        // ── Step 3: Importances ──────────────────────────────────────────────
        let feature_importances = self.engine.feature_importances(&model);

        // ── Step 4: Accuracy on the training data ────────────────────────────
        let predicted = self.engine.predict(&model, &x)?;
        let metrics   = TrainMetrics::from_predictions(&predicted, &payload.y);
        tracing::info!("Training accuracy: {:.4}", metrics.accuracy);

        // ── Step 5: Serialise ────────────────────────────────────────────────
        let bytes      = self.engine.serialize(&model).context("failed to serialise model")?;
        let model_blob = checkpoint::encode_text(&bytes);
        tracing::debug!("Model blob: {} bytes, {} base64 chars", bytes.len(), model_blob.len());

        Ok(TrainResult { model_blob, feature_importances, metrics })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::engine::GbdtEngine;

    fn use_case() -> TrainUseCase<GbdtEngine> {
        TrainUseCase::new(GbdtEngine::default())
    }

    fn payload(x: Vec<Vec<f64>>, y: Vec<f64>) -> TrainPayload {
        TrainPayload { x, y }
    }

    #[test]
    fn test_default_config_matches_fixed_hyperparameters() {
        let cfg = BoostConfig::default();
        assert_eq!(cfg.n_estimators, 100);
        assert_eq!(cfg.learning_rate, 0.1);
        assert_eq!(cfg.max_depth, 3);
        assert_eq!(cfg.random_state, 42);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            BoostConfig { n_estimators: 0, ..BoostConfig::default() },
            BoostConfig { learning_rate: -0.1, ..BoostConfig::default() },
            BoostConfig { learning_rate: f64::NAN, ..BoostConfig::default() },
            BoostConfig { max_depth: 0, ..BoostConfig::default() },
            BoostConfig { min_samples_split: 1, ..BoostConfig::default() },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?} should be rejected");
        }
    }

    #[test]
    fn test_train_result_shape() {
        let x = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0], vec![1.0, 0.0]];
        let result = use_case().execute(payload(x, vec![0.0, 1.0, 0.0, 1.0])).unwrap();

        assert_eq!(result.feature_importances.len(), 2);
        assert!((result.feature_importances.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert_eq!(result.metrics.accuracy, 1.0);
        assert!(!result.model_blob.is_empty());
    }

    #[test]
    fn test_training_is_reproducible() {
        let x: Vec<Vec<f64>> = (0..20).map(|i| vec![(i % 4) as f64, (i * 7 % 5) as f64]).collect();
        let y: Vec<f64> = (0..20).map(|i| ((i % 4) / 2) as f64).collect();

        let a = use_case().execute(payload(x.clone(), y.clone())).unwrap();
        let b = use_case().execute(payload(x, y)).unwrap();
        assert_eq!(a.model_blob, b.model_blob);
        assert_eq!(a.feature_importances, b.feature_importances);
        assert_eq!(a.metrics, b.metrics);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let x = vec![vec![0.0, 1.0], vec![1.0]];
        let err = use_case().execute(payload(x, vec![0.0, 1.0])).unwrap_err();
        assert!(format!("{err:#}").contains("inconsistent"));
    }

    #[test]
    fn test_empty_x_is_rejected() {
        assert!(use_case().execute(payload(Vec::new(), Vec::new())).is_err());
    }
}
