// ============================================================
// Layer 1 — CLI Arguments
// ============================================================
// Optional hyperparameter overrides for the `train` command.
// Left unset, every flag keeps the fixed default the bridge
// has always trained with, so existing callers see no change.
//
// Out-of-range values are not rejected by clap; they reach
// BoostConfig::validate and come back as a `train` error in
// the response envelope like any other training failure.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::Args;
use crate::application::train_use_case::BoostConfig;

/// Hyperparameter flags, flattened into the top-level Cli
#[derive(Args, Debug, Clone)]
pub struct BoostArgs {
    /// Number of boosting stages
    #[arg(long, default_value_t = 100)]
    pub n_estimators: usize,

    /// Shrinkage applied to each tree's contribution
    #[arg(long, default_value_t = 0.1)]
    pub learning_rate: f64,

    /// Maximum depth of each regression tree
    #[arg(long, default_value_t = 3)]
    pub max_depth: usize,

    /// Seed for the feature-order RNG
    #[arg(long, default_value_t = 42)]
    pub random_state: u64,
}

/// The application layer never sees clap types
impl From<BoostArgs> for BoostConfig {
    fn from(a: BoostArgs) -> Self {
        BoostConfig {
            n_estimators:  a.n_estimators,
            learning_rate: a.learning_rate,
            max_depth:     a.max_depth,
            random_state:  a.random_state,
            ..BoostConfig::default()
        }
    }
}
