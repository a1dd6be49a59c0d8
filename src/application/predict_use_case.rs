// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Runs the `predict` command:
//
//   Step 1: base64 text → bytes           (Layer 6 - infra)
//   Step 2: bytes → model (header checked) (Layer 5 - ml)
//   Step 3: validate X                     (Layer 4 - data)
//   Step 4: probability of class index 1   (Layer 5 - ml)
//
// Class index 1 is the second smallest label seen in training;
// for 0/1 labels that is the probability of "1".

use anyhow::{anyhow, Context, Result};

use crate::data::matrix::FeatureMatrix;
use crate::domain::payload::{PredictPayload, PredictResult};
use crate::domain::traits::ClassifierEngine;
use crate::infra::checkpoint;

/// Probability column reported to the caller
const POSITIVE_CLASS: usize = 1;

pub struct PredictUseCase<E> {
    engine: E,
}

impl<E: ClassifierEngine> PredictUseCase<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn execute(&self, payload: PredictPayload) -> Result<PredictResult> {
        let bytes = checkpoint::decode_text(&payload.model_blob).context("invalid model_blob")?;
        let model = self.engine.deserialize(&bytes).context("invalid model_blob")?;

        let x = FeatureMatrix::from_rows(&payload.x).context("invalid X")?;
        tracing::info!("Predicting {} rows", x.n_rows());

        let probabilities = self
            .engine
            .predict_proba(&model, &x)?
            .into_iter()
            .map(|row| {
                row.get(POSITIVE_CLASS)
                    .copied()
                    .ok_or_else(|| anyhow!("model has no class at index {POSITIVE_CLASS}"))
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(PredictResult { probabilities })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainUseCase;
    use crate::domain::payload::TrainPayload;
    use crate::ml::engine::GbdtEngine;

    fn trained_blob() -> String {
        let payload = TrainPayload {
            x: vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0], vec![1.0, 0.0]],
            y: vec![0.0, 1.0, 0.0, 1.0],
        };
        TrainUseCase::new(GbdtEngine::default()).execute(payload).unwrap().model_blob
    }

    fn predict(model_blob: String, x: Vec<Vec<f64>>) -> Result<PredictResult> {
        PredictUseCase::new(GbdtEngine::default()).execute(PredictPayload { model_blob, x })
    }

    #[test]
    fn test_positive_rows_score_higher() {
        let x = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0], vec![1.0, 0.0]];
        let p = predict(trained_blob(), x).unwrap().probabilities;

        assert_eq!(p.len(), 4);
        assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(p[1] > p[0] && p[1] > p[2]);
        assert!(p[3] > p[0] && p[3] > p[2]);
    }

    #[test]
    fn test_wrong_width_is_reported() {
        let err = predict(trained_blob(), vec![vec![1.0, 2.0, 3.0]]).unwrap_err();
        assert!(format!("{err:#}").contains("expecting 2 features"));
    }

    #[test]
    fn test_invalid_blob_is_reported() {
        assert!(predict("%%%".into(), vec![vec![0.0, 0.0]]).is_err());
        let foreign = checkpoint::encode_text(b"hello world");
        assert!(predict(foreign, vec![vec![0.0, 0.0]]).is_err());
    }
}
