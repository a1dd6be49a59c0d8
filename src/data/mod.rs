// ============================================================
// Layer 4 — Data Preparation
// ============================================================
// Everything between the raw JSON arrays of a payload and the
// typed inputs the boosting code consumes:
//
//   payload.X  (Vec<Vec<f64>>)
//       │
//       ▼
//   FeatureMatrix     → validated, flat row-major matrix
//
//   payload.y  (Vec<f64>)
//       │
//       ▼
//   ClassEncoding     → sorted distinct labels → class indices
//
// Each step rejects bad input with a ModelError before any
// tree is built.
//
// Reference: Rust Book §8 (Vectors), §9 (Recoverable Errors)

/// Validated rows × features matrix
pub mod matrix;

/// Numeric label ↔ class index mapping
pub mod labels;
