// ============================================================
// Layer 5 — ML / Boosting Layer
// ============================================================
// All learning code lives here. Other layers only see it
// through GbdtEngine (the ClassifierEngine implementation).
//
//   tree.rs     — depth-limited least-squares regression tree
//                 with a seeded, shuffled feature visiting order
//
//   loss.rs     — binomial and multinomial deviance: priors,
//                 residuals, hessians, Newton leaf values
//
//   model.rs    — GbdtModel, the fitted ensemble: raw scores,
//                 probabilities, labels, impurity importances
//
//   trainer.rs  — the boosting loop that builds a GbdtModel
//
//   engine.rs   — GbdtEngine, glue between the trait and the
//                 blob codec in infra
//
// Reference: Friedman (2001) Greedy Function Approximation
//            Breiman et al. (1984) Classification and Regression Trees

/// Regression tree learner
pub mod tree;

/// Deviance losses and link functions
pub mod loss;

/// The fitted ensemble
pub mod model;

/// Stage-wise boosting loop
pub mod trainer;

/// ClassifierEngine implementation
pub mod engine;
