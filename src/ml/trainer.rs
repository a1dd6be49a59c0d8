// ============================================================
// Layer 5 — Boosting Loop
// ============================================================
// Fits a GbdtModel stage by stage:
//
//   F_0        = class priors (log-odds / log-prior)
//   for each stage m = 1..n_estimators:
//     p        = link(F_{m-1})             probabilities per row
//     for each output k:
//       r, h   = residual and hessian of output k
//       tree   = least-squares tree fitted to r
//       leaves ← Newton step  Σr / Σh  over the rows in each leaf
//       F_m,k  = F_{m-1},k + learning_rate * tree(x)
//
// Probabilities are computed once per stage, so every output of
// a multinomial stage sees the same starting point.
//
// All randomness (feature visiting order) comes from one StdRng
// seeded with `random_state`; the same data and config always
// produce the same trees.
//
// Reference: Friedman (2001) Greedy Function Approximation
//            scikit-learn GradientBoostingClassifier (deviance loss)

use rand::{rngs::StdRng, SeedableRng};

use crate::application::train_use_case::BoostConfig;
use crate::data::{labels::ClassEncoding, matrix::FeatureMatrix};
use crate::domain::error::ModelError;
use crate::ml::{loss::Deviance, model::GbdtModel, tree::RegressionTree};

/// How often (in stages) the training loss is logged at debug level
const LOG_EVERY: usize = 25;

pub fn fit(x: &FeatureMatrix, y: &[f64], config: &BoostConfig) -> Result<GbdtModel, ModelError> {
    config.validate()?;

    if y.len() != x.n_rows() {
        return Err(ModelError::invalid(format!(
            "Found input variables with inconsistent numbers of samples: X has {} rows, y has {} labels",
            x.n_rows(),
            y.len()
        )));
    }

    let classes = ClassEncoding::fit(y)?;
    if classes.n_classes() < 2 {
        return Err(ModelError::invalid(format!(
            "y contains {} class; at least 2 classes are required",
            classes.n_classes()
        )));
    }
    let labels   = classes.encode(y)?;
    let deviance = Deviance::for_classes(classes.n_classes());
    let init     = deviance.init_scores(&labels);

    tracing::debug!(
        "Fitting {} stages on {} rows × {} features ({} classes)",
        config.n_estimators,
        x.n_rows(),
        x.n_features(),
        classes.n_classes()
    );

    let params     = config.tree_params();
    let mut rng    = StdRng::seed_from_u64(config.random_state);
    let mut raw    = vec![init.clone(); x.n_rows()];
    let mut stages = Vec::with_capacity(config.n_estimators);

    for stage in 1..=config.n_estimators {
        let proba: Vec<Vec<f64>> = raw.iter().map(|scores| deviance.probabilities(scores)).collect();

        let mut trees = Vec::with_capacity(deviance.n_outputs());
        for k in 0..deviance.n_outputs() {
            let (residuals, hessians): (Vec<f64>, Vec<f64>) = labels
                .iter()
                .zip(&proba)
                .map(|(&label, p)| deviance.gradient(label, p, k))
                .unzip();

            let mut tree = RegressionTree::fit(x, &residuals, &params, &mut rng);
            apply_newton_step(&mut tree, x, &residuals, &hessians, &deviance);

            for (i, scores) in raw.iter_mut().enumerate() {
                scores[k] += config.learning_rate * tree.predict(x.row(i));
            }
            trees.push(tree);
        }
        stages.push(trees);

        if stage % LOG_EVERY == 0 {
            tracing::debug!("Stage {:>4}: train deviance={:.6}", stage, deviance.mean_loss(&labels, &raw));
        }
    }

    tracing::info!(
        "Boosting complete: {} stages, final train deviance={:.6}",
        stages.len(),
        deviance.mean_loss(&labels, &raw)
    );

    Ok(GbdtModel::new(config.clone(), classes, deviance, x.n_features(), init, stages))
}

/// Replace each leaf's mean residual with one Newton step on the
/// rows that reach it.
fn apply_newton_step(
    tree:      &mut RegressionTree,
    x:         &FeatureMatrix,
    residuals: &[f64],
    hessians:  &[f64],
    deviance:  &Deviance,
) {
    // (Σ residual, Σ hessian, rows) per node index
    let mut sums = vec![(0.0, 0.0, 0usize); tree.node_count()];
    for (i, row) in x.rows().enumerate() {
        let leaf = tree.leaf_index(row);
        sums[leaf].0 += residuals[i];
        sums[leaf].1 += hessians[i];
        sums[leaf].2 += 1;
    }

    for (idx, (sum_r, sum_h, count)) in sums.into_iter().enumerate() {
        if count > 0 {
            tree.set_leaf_value(idx, deviance.leaf_value(sum_r, sum_h));
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[Vec<f64>]) -> FeatureMatrix {
        FeatureMatrix::from_rows(rows).unwrap()
    }

    fn xor_free_data() -> (FeatureMatrix, Vec<f64>) {
        let x = matrix(&[vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0], vec![1.0, 0.0]]);
        (x, vec![0.0, 1.0, 0.0, 1.0])
    }

    #[test]
    fn test_fit_learns_the_label_feature() {
        let (x, y) = xor_free_data();
        let model = fit(&x, &y, &BoostConfig::default()).unwrap();

        assert_eq!(model.n_estimators(), 100);
        assert_eq!(model.predict(&x).unwrap(), y);

        let proba = model.predict_proba(&x).unwrap();
        assert!(proba[1][1] > proba[0][1]);
        assert!(proba[3][1] > proba[2][1]);

        let imp = model.feature_importances();
        assert!((imp[0] - 1.0).abs() < 1e-12);
        assert_eq!(imp[1], 0.0);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let rows: Vec<Vec<f64>> = (0..40)
            .map(|i| vec![(i % 7) as f64, (i % 5) as f64, (i % 3) as f64])
            .collect();
        let y: Vec<f64> = (0..40).map(|i| if (i % 7) + (i % 3) > 4 { 1.0 } else { 0.0 }).collect();
        let x = matrix(&rows);

        let a = fit(&x, &y, &BoostConfig::default()).unwrap();
        let b = fit(&x, &y, &BoostConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_multiclass_fit() {
        let rows: Vec<Vec<f64>> = (0..30).map(|i| vec![i as f64, 0.0]).collect();
        let y: Vec<f64> = (0..30).map(|i| (i / 10) as f64).collect();
        let x = matrix(&rows);
        let config = BoostConfig { n_estimators: 20, ..BoostConfig::default() };

        let model = fit(&x, &y, &config).unwrap();
        assert_eq!(model.classes().n_classes(), 3);
        assert_eq!(model.predict(&x).unwrap(), y);
        for p in model.predict_proba(&x).unwrap() {
            assert_eq!(p.len(), 3);
            assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_single_class_is_rejected() {
        let x = matrix(&[vec![0.0], vec![1.0]]);
        let err = fit(&x, &[1.0, 1.0], &BoostConfig::default()).unwrap_err();
        assert!(err.to_string().contains("1 class"));
    }

    #[test]
    fn test_label_count_mismatch_is_rejected() {
        let (x, _) = xor_free_data();
        assert!(fit(&x, &[0.0, 1.0], &BoostConfig::default()).is_err());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let (x, y) = xor_free_data();
        let config = BoostConfig { learning_rate: 0.0, ..BoostConfig::default() };
        assert!(matches!(fit(&x, &y, &config), Err(ModelError::InvalidConfig(_))));
    }
}
