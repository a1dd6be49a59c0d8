// ============================================================
// Layer 5 — Deviance Losses
// ============================================================
// The two classification losses the booster optimises:
//
//   Binomial    (2 classes)  one raw score per row, F = log-odds
//       p        = sigmoid(F)
//       residual = y - p
//       hessian  = p (1 - p)
//
//   Multinomial (K > 2)      one raw score per class per row
//       p_k      = softmax(F)_k
//       residual = 1[y = k] - p_k
//       hessian  = p_k (1 - p_k)
//
// Leaves take one Newton step:
//       value = scale * Σ residual / Σ hessian
// with scale = 1 for binomial and (K - 1) / K for multinomial.
//
// Reference: Friedman (2001) Greedy Function Approximation, Algorithms 5 & 6
//            Hastie, Tibshirani & Friedman, ESL §10.10

use serde::{Deserialize, Serialize};

/// Smallest hessian sum a leaf may divide by
const MIN_HESSIAN: f64 = 1e-150;

/// Keeps priors away from 0 and 1 before taking logs
const PROBA_CLIP: f64 = 1e-15;

pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Numerically stable softmax (max-shifted)
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deviance {
    Binomial,
    Multinomial { n_classes: usize },
}

impl Deviance {
    /// Pick the loss for a number of classes (>= 2)
    pub fn for_classes(n_classes: usize) -> Self {
        if n_classes <= 2 { Self::Binomial } else { Self::Multinomial { n_classes } }
    }

    /// Raw scores (and trees) per row per boosting stage
    pub fn n_outputs(&self) -> usize {
        match self {
            Self::Binomial                  => 1,
            Self::Multinomial { n_classes } => *n_classes,
        }
    }

    pub fn n_classes(&self) -> usize {
        match self {
            Self::Binomial                  => 2,
            Self::Multinomial { n_classes } => *n_classes,
        }
    }

    /// Initial raw scores from the class priors of `labels`.
    pub fn init_scores(&self, labels: &[usize]) -> Vec<f64> {
        let n          = labels.len().max(1) as f64;
        let mut counts = vec![0usize; self.n_classes()];
        for &l in labels {
            if let Some(c) = counts.get_mut(l) {
                *c += 1;
            }
        }
        let prior = |c: usize| (c as f64 / n).clamp(PROBA_CLIP, 1.0 - PROBA_CLIP);

        match self {
            Self::Binomial => {
                let p = prior(counts[1]);
                vec![(p / (1.0 - p)).ln()]
            }
            Self::Multinomial { .. } => counts.iter().map(|&c| prior(c).ln()).collect(),
        }
    }

    /// Class probabilities for one row of raw scores
    pub fn probabilities(&self, raw: &[f64]) -> Vec<f64> {
        match self {
            Self::Binomial => {
                let p = sigmoid(raw[0]);
                vec![1.0 - p, p]
            }
            Self::Multinomial { .. } => softmax(raw),
        }
    }

    /// Residual and hessian of output `k` for one row, given that
    /// row's class probabilities.
    pub fn gradient(&self, label: usize, proba: &[f64], k: usize) -> (f64, f64) {
        // Binomial models the probability of class 1 with its single output
        let class = match self {
            Self::Binomial           => 1,
            Self::Multinomial { .. } => k,
        };
        let p      = proba[class];
        let target = if label == class { 1.0 } else { 0.0 };
        (target - p, p * (1.0 - p))
    }

    /// Newton step for a leaf holding `sum_residual` / `sum_hessian`
    pub fn leaf_value(&self, sum_residual: f64, sum_hessian: f64) -> f64 {
        if sum_hessian.abs() < MIN_HESSIAN {
            return 0.0;
        }
        let scale = match self {
            Self::Binomial                  => 1.0,
            Self::Multinomial { n_classes } => (*n_classes as f64 - 1.0) / *n_classes as f64,
        };
        scale * sum_residual / sum_hessian
    }

    /// Mean deviance (negative log-likelihood) over all rows
    pub fn mean_loss(&self, labels: &[usize], raw: &[Vec<f64>]) -> f64 {
        if labels.is_empty() {
            return 0.0;
        }
        let total: f64 = labels
            .iter()
            .zip(raw)
            .map(|(&label, scores)| {
                let p = self.probabilities(scores).get(label).copied().unwrap_or(0.0);
                -p.clamp(PROBA_CLIP, 1.0).ln()
            })
            .sum();
        total / labels.len() as f64
    }
}
