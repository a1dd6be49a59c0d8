// ============================================================
// Layer 5 — Regression Tree
// ============================================================
// Depth-limited least-squares regression tree, fitted to the
// pseudo-residuals of one boosting stage.
//
// Split search (per node):
//   - visit the features in an order shuffled by the stage RNG,
//     so equally good splits are broken reproducibly by the seed
//   - for each feature, sort the node's rows by value and scan
//     every boundary between distinct values
//   - score a boundary with the Friedman improvement
//         n_l * n_r / n * (mean_l - mean_r)²
//     which is also the drop in squared error, so the same
//     number feeds the impurity-based feature importances
//
// A node becomes a leaf when it reaches max_depth, holds fewer
// than min_samples_split rows, has (near) zero variance, or no
// boundary leaves min_samples_leaf rows on both sides.
//
// Nodes are stored in pre-order: a child index is always larger
// than its parent's, which keeps traversal of a decoded tree
// finite.
//
// Reference: Breiman et al. (1984) Classification and Regression Trees
//            Friedman (2001) Greedy Function Approximation

use rand::{rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::data::matrix::FeatureMatrix;
use crate::domain::error::ModelError;

/// Minimum gap between two feature values for a boundary to count
const FEATURE_THRESHOLD: f64 = 1e-7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Split {
        feature:   usize,
        threshold: f64,
        left:      usize,
        right:     usize,
        /// Weighted squared-error decrease of this split
        gain:      f64,
        n_samples: usize,
    },
    Leaf {
        value:     f64,
        n_samples: usize,
    },
}

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth:         usize,
    pub min_samples_split: usize,
    pub min_samples_leaf:  usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

struct BestSplit {
    feature:   usize,
    threshold: f64,
    gain:      f64,
}

impl RegressionTree {
    /// Fit a tree on all rows of `x` against `targets`.
    pub fn fit(x: &FeatureMatrix, targets: &[f64], params: &TreeParams, rng: &mut StdRng) -> Self {
        let rows: Vec<usize> = (0..x.n_rows()).collect();
        let mut builder = TreeBuilder { x, targets, params, rng, nodes: Vec::new() };
        builder.grow(&rows, 0);
        Self { nodes: builder.nodes }
    }

    #[cfg(test)]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Index of the leaf `row` falls into
    pub fn leaf_index(&self, row: &[f64]) -> usize {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { .. } => return idx,
                TreeNode::Split { feature, threshold, left, right, .. } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        match &self.nodes[self.leaf_index(row)] {
            TreeNode::Leaf { value, .. } => *value,
            TreeNode::Split { .. } => 0.0,
        }
    }

    /// Overwrite the value of a leaf node. Split indices are ignored.
    pub fn set_leaf_value(&mut self, idx: usize, new_value: f64) {
        if let Some(TreeNode::Leaf { value, .. }) = self.nodes.get_mut(idx) {
            *value = new_value;
        }
    }

    /// Unnormalised impurity importances: the gain of every split
    /// summed per feature, divided by the number of rows at the root.
    pub fn feature_importances(&self, n_features: usize) -> Vec<f64> {
        let mut importances = vec![0.0; n_features];
        let root_samples = match self.nodes.first() {
            Some(TreeNode::Split { n_samples, .. }) | Some(TreeNode::Leaf { n_samples, .. }) => *n_samples,
            None => 0,
        };
        if root_samples == 0 {
            return importances;
        }

        for node in &self.nodes {
            if let TreeNode::Split { feature, gain, .. } = node {
                if let Some(slot) = importances.get_mut(*feature) {
                    *slot += gain;
                }
            }
        }
        for v in importances.iter_mut() {
            *v /= root_samples as f64;
        }
        importances
    }

    /// Structural checks for a tree read back from a blob.
    pub fn check_integrity(&self, n_features: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Corrupt("tree has no nodes".into()));
        }
        let count = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right, .. } => {
                    if *feature >= n_features {
                        return Err(ModelError::Corrupt(format!(
                            "node {idx} splits on feature {feature} of {n_features}"
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ModelError::Corrupt(format!("node {idx} has a NaN threshold")));
                    }
                    // Children must come after the parent (pre-order) and exist
                    if *left <= idx || *right <= idx || *left >= count || *right >= count {
                        return Err(ModelError::Corrupt(format!("node {idx} has out-of-range children")));
                    }
                }
                TreeNode::Leaf { value, .. } => {
                    if value.is_nan() {
                        return Err(ModelError::Corrupt(format!("leaf {idx} has a NaN value")));
                    }
                }
            }
        }
        Ok(())
    }
}

// ─── Builder ──────────────────────────────────────────────────────────────────
struct TreeBuilder<'a> {
    x:       &'a FeatureMatrix,
    targets: &'a [f64],
    params:  &'a TreeParams,
    rng:     &'a mut StdRng,
    nodes:   Vec<TreeNode>,
}

impl TreeBuilder<'_> {
    /// Grow the subtree for `rows`, returning the index of its root.
    fn grow(&mut self, rows: &[usize], depth: usize) -> usize {
        let n = rows.len();
        let (sum, sum_sq) = rows.iter().fold((0.0, 0.0), |(s, sq), &i| {
            let t = self.targets[i];
            (s + t, sq + t * t)
        });
        let mean     = if n > 0 { sum / n as f64 } else { 0.0 };
        let variance = if n > 0 { (sum_sq / n as f64 - mean * mean).max(0.0) } else { 0.0 };

        let is_leaf = depth >= self.params.max_depth
            || n < self.params.min_samples_split
            || n < 2 * self.params.min_samples_leaf
            || variance <= f64::EPSILON;

        let split = if is_leaf { None } else { self.best_split(rows) };

        let Some(split) = split else {
            return self.push(TreeNode::Leaf { value: mean, n_samples: n });
        };

        let x = self.x;
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .copied()
            .partition(|&i| x.value(i, split.feature) <= split.threshold);

        // Placeholder, filled once both children have indices
        let node_idx = self.push(TreeNode::Leaf { value: mean, n_samples: n });
        let left  = self.grow(&left_rows, depth + 1);
        let right = self.grow(&right_rows, depth + 1);

        self.nodes[node_idx] = TreeNode::Split {
            feature:   split.feature,
            threshold: split.threshold,
            left,
            right,
            gain:      split.gain,
            n_samples: n,
        };
        node_idx
    }

    fn push(&mut self, node: TreeNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Best Friedman-improvement boundary over all features, if any
    /// boundary improves on zero.
    fn best_split(&mut self, rows: &[usize]) -> Option<BestSplit> {
        let (x, targets) = (self.x, self.targets);
        let n = rows.len();
        if n < 2 {
            return None;
        }
        let min_leaf       = self.params.min_samples_leaf.max(1);
        let total_sum: f64 = rows.iter().map(|&i| targets[i]).sum();

        let mut features: Vec<usize> = (0..x.n_features()).collect();
        features.shuffle(&mut *self.rng);

        let mut best: Option<BestSplit> = None;
        let mut sorted = rows.to_vec();

        for feature in features {
            sorted.sort_by(|&a, &b| x.value(a, feature).total_cmp(&x.value(b, feature)));

            let mut left_sum = 0.0;
            for pos in 0..n - 1 {
                left_sum += targets[sorted[pos]];

                let here = x.value(sorted[pos], feature);
                let next = x.value(sorted[pos + 1], feature);
                if next <= here + FEATURE_THRESHOLD {
                    continue;
                }

                let n_left  = pos + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let mean_left  = left_sum / n_left as f64;
                let mean_right = (total_sum - left_sum) / n_right as f64;
                let diff       = mean_left - mean_right;
                let gain       = (n_left * n_right) as f64 / n as f64 * diff * diff;

                if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                    best = Some(BestSplit { feature, threshold: midpoint(here, next), gain });
                }
            }
        }

        best
    }
}

/// Halfway between two values; falls back to the lower one when
/// rounding would place the midpoint on the upper value.
fn midpoint(low: f64, high: f64) -> f64 {
    let mid = low / 2.0 + high / 2.0;
    if mid >= high || !mid.is_finite() { low } else { mid }
}
