// ============================================================
// Layer 5 — GbdtEngine
// ============================================================
// The ClassifierEngine implementation backed by the in-crate
// boosting code. Holds only the hyperparameters; every fitted
// model is a standalone GbdtModel value.
//
// Blob bytes go through infra::checkpoint, which adds and checks
// the format header. A decoded model is checked structurally
// before it is handed out, so a crafted blob is reported as an
// error instead of reaching the tree walk.

use anyhow::Result;

use crate::application::train_use_case::BoostConfig;
use crate::data::matrix::FeatureMatrix;
use crate::domain::traits::ClassifierEngine;
use crate::infra::checkpoint;
use crate::ml::{model::GbdtModel, trainer};

#[derive(Debug, Clone, Default)]
pub struct GbdtEngine {
    config: BoostConfig,
}

impl GbdtEngine {
    pub fn new(config: BoostConfig) -> Self {
        Self { config }
    }
}

impl ClassifierEngine for GbdtEngine {
    type Model = GbdtModel;

    fn fit(&self, x: &FeatureMatrix, y: &[f64]) -> Result<GbdtModel> {
        Ok(trainer::fit(x, y, &self.config)?)
    }

    fn predict_proba(&self, model: &GbdtModel, x: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
        Ok(model.predict_proba(x)?)
    }

    fn predict(&self, model: &GbdtModel, x: &FeatureMatrix) -> Result<Vec<f64>> {
        Ok(model.predict(x)?)
    }

    fn feature_importances(&self, model: &GbdtModel) -> Vec<f64> {
        model.feature_importances()
    }

    fn serialize(&self, model: &GbdtModel) -> Result<Vec<u8>> {
        Ok(checkpoint::to_bytes(model)?)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<GbdtModel> {
        let model: GbdtModel = checkpoint::from_bytes(bytes)?;
        model.check_integrity()?;
        tracing::debug!(
            "Decoded model: {} stages, {} features, {} classes",
            model.n_estimators(),
            model.n_features(),
            model.classes().n_classes()
        );
        Ok(model)
    }
}
