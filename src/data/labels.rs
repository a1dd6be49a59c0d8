// ============================================================
// Layer 4 — Class Encoding
// ============================================================
// Maps numeric labels (y) to class indices 0..K.
//
// Classes are the distinct label values in ascending order, so
// for the usual 0/1 churn labels class 0 is "0" and class 1 is
// "1". The positive class reported by `predict` is always the
// class at index 1.
//
// Labels must be whole numbers; -0.0 and 0.0 are the same label.

use serde::{Deserialize, Serialize};

use crate::domain::error::ModelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassEncoding {
    /// Sorted, distinct label values
    classes: Vec<f64>,
}

/// Fold -0.0 into 0.0 so both compare equal under total ordering
fn canonical(label: f64) -> f64 {
    if label == 0.0 { 0.0 } else { label }
}

impl ClassEncoding {
    /// Collect the distinct labels of `y`.
    pub fn fit(y: &[f64]) -> Result<Self, ModelError> {
        if let Some(i) = y.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::invalid(format!("Input y contains NaN or infinity at index {i}")));
        }
        // Class labels are whole numbers; anything else is a regression target
        if let Some(i) = y.iter().position(|v| v.fract() != 0.0) {
            return Err(ModelError::invalid(format!(
                "Unknown label type: continuous (y[{i}] = {} is not a whole number)",
                y[i]
            )));
        }

        let mut classes: Vec<f64> = y.iter().copied().map(canonical).collect();
        classes.sort_by(f64::total_cmp);
        classes.dedup();

        Ok(Self { classes })
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    #[cfg(test)]
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    /// Index of a label, or None if it was not seen during fit
    pub fn index_of(&self, label: f64) -> Option<usize> {
        let label = canonical(label);
        self.classes.binary_search_by(|c| c.total_cmp(&label)).ok()
    }

    /// Encode every label of `y` as a class index.
    pub fn encode(&self, y: &[f64]) -> Result<Vec<usize>, ModelError> {
        y.iter()
            .map(|&v| {
                self.index_of(v)
                    .ok_or_else(|| ModelError::invalid(format!("y contains previously unseen label {v}")))
            })
            .collect()
    }

    /// Label value of a class index
    pub fn label(&self, index: usize) -> Option<f64> {
        self.classes.get(index).copied()
    }

    /// True when classes are strictly ascending (integrity check after decode)
    pub fn is_sorted(&self) -> bool {
        self.classes.windows(2).all(|w| w[0] < w[1])
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_are_sorted_and_distinct() {
        let enc = ClassEncoding::fit(&[1.0, 0.0, 1.0, 0.0, 1.0]).unwrap();
        assert_eq!(enc.classes(), &[0.0, 1.0]);
        assert_eq!(enc.encode(&[0.0, 1.0, 1.0]).unwrap(), vec![0, 1, 1]);
    }

    #[test]
    fn test_arbitrary_numeric_labels() {
        let enc = ClassEncoding::fit(&[5.0, -2.0, 3.0, 5.0]).unwrap();
        assert_eq!(enc.classes(), &[-2.0, 3.0, 5.0]);
        assert_eq!(enc.label(1), Some(3.0));
        assert_eq!(enc.index_of(5.0), Some(2));
        assert_eq!(enc.index_of(4.0), None);
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let enc = ClassEncoding::fit(&[-0.0, 0.0, 1.0]).unwrap();
        assert_eq!(enc.n_classes(), 2);
        assert_eq!(enc.index_of(-0.0), Some(0));
    }

    #[test]
    fn test_fractional_labels_are_continuous() {
        let err = ClassEncoding::fit(&[0.5, 1.5, 2.7]).unwrap_err();
        assert!(err.to_string().starts_with("Unknown label type: continuous"));
        assert!(ClassEncoding::fit(&[0.0, 1.0, 0.25]).is_err());
    }

    #[test]
    fn test_unseen_label_fails_to_encode() {
        let enc = ClassEncoding::fit(&[0.0, 1.0]).unwrap();
        assert!(enc.encode(&[2.0]).is_err());
    }
}
