// ============================================================
// Layer 5 — Boosted Ensemble Model
// ============================================================
// The fitted classifier: class priors as initial raw scores plus
// one regression tree per output per boosting stage.
//
//   raw_k(x) = init_k + learning_rate * Σ_stages tree_{stage,k}(x)
//
// Binomial models keep a single output (log-odds of class 1);
// multinomial models keep one output per class. Everything the
// model needs to predict lives in this struct, so serialising it
// is enough to rebuild an identical model later.

use serde::{Deserialize, Serialize};

use crate::application::train_use_case::BoostConfig;
use crate::data::{labels::ClassEncoding, matrix::FeatureMatrix};
use crate::domain::error::ModelError;
use crate::ml::{loss::Deviance, tree::RegressionTree};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbdtModel {
    /// Hyperparameters the model was trained with
    config:      BoostConfig,
    classes:     ClassEncoding,
    deviance:    Deviance,
    n_features:  usize,
    init_scores: Vec<f64>,
    /// stages[s][k] is the tree of stage s for output k
    stages:      Vec<Vec<RegressionTree>>,
}

impl GbdtModel {
    pub fn new(
        config:      BoostConfig,
        classes:     ClassEncoding,
        deviance:    Deviance,
        n_features:  usize,
        init_scores: Vec<f64>,
        stages:      Vec<Vec<RegressionTree>>,
    ) -> Self {
        Self { config, classes, deviance, n_features, init_scores, stages }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_estimators(&self) -> usize {
        self.stages.len()
    }

    pub fn classes(&self) -> &ClassEncoding {
        &self.classes
    }

    /// Raw (pre-link) scores of one row, one per output
    pub fn raw_scores(&self, row: &[f64]) -> Vec<f64> {
        let mut scores = self.init_scores.clone();
        for stage in &self.stages {
            for (k, tree) in stage.iter().enumerate() {
                scores[k] += self.config.learning_rate * tree.predict(row);
            }
        }
        scores
    }

    fn check_width(&self, x: &FeatureMatrix) -> Result<(), ModelError> {
        if x.n_features() != self.n_features {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features,
                found:    x.n_features(),
            });
        }
        Ok(())
    }

    /// Class probabilities per row, columns in sorted class order.
    pub fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<Vec<f64>>, ModelError> {
        self.check_width(x)?;
        Ok(x.rows()
            .map(|row| self.deviance.probabilities(&self.raw_scores(row)))
            .collect())
    }

    /// Most probable class label per row (first class wins ties).
    pub fn predict(&self, x: &FeatureMatrix) -> Result<Vec<f64>, ModelError> {
        self.predict_proba(x)?
            .iter()
            .map(|proba| {
                let best = proba
                    .iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
                    .0;
                self.classes
                    .label(best)
                    .ok_or_else(|| ModelError::Corrupt(format!("class index {best} has no label")))
            })
            .collect()
    }

    /// Impurity-based importances averaged over every tree that split
    /// at least once, normalised to sum to 1.0. All zeros when no
    /// tree ever split.
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.n_features];
        for tree in self.stages.iter().flatten().filter(|t| t.node_count() > 1) {
            for (slot, v) in total.iter_mut().zip(tree.feature_importances(self.n_features)) {
                *slot += v;
            }
        }

        // Normalising the sum is the same as normalising the mean
        let sum: f64 = total.iter().sum();
        if sum <= 0.0 {
            return vec![0.0; self.n_features];
        }
        total.into_iter().map(|v| v / sum).collect()
    }

    /// Structural checks for a model read back from a blob; a model
    /// that passes can be evaluated without out-of-range indexing.
    pub fn check_integrity(&self) -> Result<(), ModelError> {
        if self.n_features == 0 {
            return Err(ModelError::Corrupt("model has no features".into()));
        }
        if self.classes.n_classes() < 2 || !self.classes.is_sorted() {
            return Err(ModelError::Corrupt("class list is invalid".into()));
        }
        if self.deviance.n_classes() != self.classes.n_classes() {
            return Err(ModelError::Corrupt("loss does not match the class count".into()));
        }
        let outputs = self.deviance.n_outputs();
        if self.init_scores.len() != outputs {
            return Err(ModelError::Corrupt("initial scores do not match the loss".into()));
        }
        if !self.config.learning_rate.is_finite() {
            return Err(ModelError::Corrupt("learning rate is not finite".into()));
        }
        for (s, stage) in self.stages.iter().enumerate() {
            if stage.len() != outputs {
                return Err(ModelError::Corrupt(format!("stage {s} has {} trees, expected {outputs}", stage.len())));
            }
            for tree in stage {
                tree.check_integrity(self.n_features)?;
            }
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use crate::ml::tree::TreeParams;

    fn matrix(rows: &[&[f64]]) -> FeatureMatrix {
        let rows: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
        FeatureMatrix::from_rows(&rows).unwrap()
    }

    /// One-stage binomial model splitting on feature 0
    fn stump_model() -> GbdtModel {
        let x = matrix(&[&[0.0, 9.0], &[1.0, 9.0]]);
        let params = TreeParams { max_depth: 1, min_samples_split: 2, min_samples_leaf: 1 };
        let mut tree = RegressionTree::fit(&x, &[-1.0, 1.0], &params, &mut StdRng::seed_from_u64(0));
        let left  = tree.leaf_index(&[0.0, 9.0]);
        let right = tree.leaf_index(&[1.0, 9.0]);
        tree.set_leaf_value(left, -20.0);
        tree.set_leaf_value(right, 20.0);

        GbdtModel::new(
            BoostConfig::default(),
            ClassEncoding::fit(&[0.0, 1.0]).unwrap(),
            Deviance::Binomial,
            2,
            vec![0.0],
            vec![vec![tree]],
        )
    }

    #[test]
    fn test_probabilities_follow_raw_scores() {
        let model = stump_model();
        let x = matrix(&[&[0.0, 0.0], &[1.0, 0.0]]);
        let proba = model.predict_proba(&x).unwrap();
        // raw = 0 ± 0.1 * 20 = ±2
        assert!(proba[0][1] < 0.5);
        assert!(proba[1][1] > 0.5);
        for row in &proba {
            assert!((row[0] + row[1] - 1.0).abs() < 1e-12);
        }
        assert_eq!(model.predict(&x).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_feature_count_mismatch_is_an_error() {
        let model = stump_model();
        let x = matrix(&[&[0.0, 0.0, 0.0]]);
        match model.predict_proba(&x) {
            Err(ModelError::FeatureMismatch { expected: 2, found: 3 }) => {}
            other => panic!("expected a feature mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_importances_are_normalised() {
        let imp = stump_model().feature_importances();
        assert_eq!(imp.len(), 2);
        assert!((imp.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(imp[1], 0.0);
    }

    #[test]
    fn test_integrity_catches_stage_width() {
        let mut model = stump_model();
        assert!(model.check_integrity().is_ok());
        model.stages.push(Vec::new());
        assert!(model.check_integrity().is_err());
    }
}
