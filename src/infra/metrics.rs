// ============================================================
// Layer 6 — Training Metrics
// ============================================================
// Metrics reported in the `metrics` object of a train result.
//
// Accuracy is measured on the rows the model was fitted on, so
// it is optimistic: a high score says the ensemble fits the
// training data, not that it generalises.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainMetrics {
    /// Fraction of rows whose predicted label equals the true label, in [0, 1]
    pub accuracy: f64,
}

impl TrainMetrics {
    pub fn from_predictions(predicted: &[f64], actual: &[f64]) -> Self {
        Self { accuracy: accuracy(predicted, actual) }
    }
}

/// Share of positions where both slices agree; 0.0 for empty input.
pub fn accuracy(predicted: &[f64], actual: &[f64]) -> f64 {
    let n = predicted.len().min(actual.len());
    if n == 0 {
        return 0.0;
    }
    let correct = predicted.iter().zip(actual).filter(|(p, a)| p == a).count();
    correct as f64 / n as f64
}
