// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The dispatcher and use cases never name the boosting code
// directly; they program against ClassifierEngine. Swapping the
// learning algorithm means writing another implementation of
// this trait; the JSON contract stays untouched.
//
// Blobs written by one engine are only readable by the same
// engine (and blob format version). Moving to another engine
// needs an explicit conversion step, not blob reuse.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §19 (Associated Types)

use anyhow::Result;

use crate::data::matrix::FeatureMatrix;

// ─── ClassifierEngine ─────────────────────────────────────────────────────────
/// A trainable, serialisable probabilistic classifier.
///
/// Implementations:
///   - GbdtEngine → gradient-boosted regression trees (ml layer)
pub trait ClassifierEngine {
    /// The fitted model produced by `fit`
    type Model;

    /// Fit a fresh model on rows `x` with one label per row in `y`.
    fn fit(&self, x: &FeatureMatrix, y: &[f64]) -> Result<Self::Model>;

    /// Class probabilities per row; columns follow the sorted class labels.
    fn predict_proba(&self, model: &Self::Model, x: &FeatureMatrix) -> Result<Vec<Vec<f64>>>;

    /// Most probable class label per row.
    fn predict(&self, model: &Self::Model, x: &FeatureMatrix) -> Result<Vec<f64>>;

    /// Relative contribution of each input column, summing to 1.0.
    fn feature_importances(&self, model: &Self::Model) -> Vec<f64>;

    /// Full-fidelity binary form of the model.
    fn serialize(&self, model: &Self::Model) -> Result<Vec<u8>>;

    /// Rebuild a model from bytes produced by `serialize`.
    fn deserialize(&self, bytes: &[u8]) -> Result<Self::Model>;
}
