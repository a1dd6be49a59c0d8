// ============================================================
// Layer 4 — Feature Matrix
// ============================================================
// Turns the JSON rows of X into a validated, flat row-major
// matrix the tree code can index without bounds surprises.
//
// Checks (in order):
//   1. at least one row
//   2. at least one feature column
//   3. every row has the same length as the first
//   4. every value is finite
//
// Storage is one Vec<f64> of n_rows * n_features values;
// row i lives at values[i * n_features .. (i + 1) * n_features].

use crate::domain::error::ModelError;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    values:     Vec<f64>,
    n_rows:     usize,
    n_features: usize,
}

impl FeatureMatrix {
    /// Build a matrix from JSON-style rows, rejecting empty,
    /// ragged or non-finite input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ModelError> {
        let first = rows.first().ok_or_else(|| {
            ModelError::invalid("Found array with 0 sample(s) (shape=(0, 0)) while a minimum of 1 is required")
        })?;

        let n_features = first.len();
        if n_features == 0 {
            return Err(ModelError::invalid(format!(
                "Found array with 0 feature(s) (shape=({}, 0)) while a minimum of 1 is required",
                rows.len()
            )));
        }

        let mut values = Vec::with_capacity(rows.len() * n_features);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_features {
                return Err(ModelError::invalid(format!(
                    "X has inconsistent row lengths: row {} has {} values, expected {}",
                    i,
                    row.len(),
                    n_features
                )));
            }
            if let Some(j) = row.iter().position(|v| !v.is_finite()) {
                return Err(ModelError::invalid(format!(
                    "Input X contains NaN or infinity at row {i}, column {j}"
                )));
            }
            values.extend_from_slice(row);
        }

        Ok(Self { values, n_rows: rows.len(), n_features })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Row `i` as a slice of length n_features
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n_features..(i + 1) * self.n_features]
    }

    /// Single cell
    pub fn value(&self, row: usize, feature: usize) -> f64 {
        self.values[row * self.n_features + feature]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks_exact(self.n_features)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_rows_are_accepted() {
        let m = FeatureMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_features(), 2);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.value(2, 0), 5.0);
        assert_eq!(m.rows().count(), 3);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = FeatureMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(err.to_string().contains("inconsistent row lengths"));
    }

    #[test]
    fn test_empty_matrix_is_rejected() {
        assert!(FeatureMatrix::from_rows(&[]).is_err());
    }

    #[test]
    fn test_zero_feature_rows_are_rejected() {
        let err = FeatureMatrix::from_rows(&[vec![], vec![]]).unwrap_err();
        assert!(err.to_string().contains("0 feature(s)"));
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        assert!(FeatureMatrix::from_rows(&[vec![1.0, f64::NAN]]).is_err());
        assert!(FeatureMatrix::from_rows(&[vec![f64::INFINITY]]).is_err());
    }
}
