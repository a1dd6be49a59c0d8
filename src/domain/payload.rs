// ============================================================
// Layer 3 — Operation Payloads and Results
// ============================================================
// Typed views of the `payload` object for each command and of
// the `data` object each command returns.
//
// X is rows × features. serde rejects non-numeric cells here;
// rectangularity and row/label counts are checked later by
// FeatureMatrix and the use cases.

use serde::{Deserialize, Serialize};

use crate::infra::metrics::TrainMetrics;

/// Input of the `train` command
#[derive(Debug, Clone, Deserialize)]
pub struct TrainPayload {
    #[serde(rename = "X")]
    pub x: Vec<Vec<f64>>,

    /// One label per row of X
    pub y: Vec<f64>,
}

/// Output of the `train` command
#[derive(Debug, Clone, Serialize)]
pub struct TrainResult {
    /// Opaque base64 text; the caller stores it and hands it back to `predict`
    pub model_blob: String,

    /// One entry per column of X, summing to 1.0
    pub feature_importances: Vec<f64>,

    pub metrics: TrainMetrics,
}

/// Input of the `predict` command
#[derive(Debug, Clone, Deserialize)]
pub struct PredictPayload {
    /// Older callers send the blob as `model_json`
    #[serde(alias = "model_json")]
    pub model_blob: String,

    #[serde(rename = "X")]
    pub x: Vec<Vec<f64>>,
}

/// Output of the `predict` command
#[derive(Debug, Clone, Serialize)]
pub struct PredictResult {
    /// Probability of the positive class, one per input row, in input order
    pub probabilities: Vec<f64>,
}
