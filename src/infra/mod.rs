// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting pieces used by the ml and application layers:
//
//   checkpoint.rs — model blob codec
//                   bincode bytes behind a "GBDT" header,
//                   carried as base64 text inside the JSON
//
//   metrics.rs    — training metrics (accuracy) reported
//                   alongside the blob
//
// Reference: Rust Book §7 (Modules)

/// Model blob encoding and decoding
pub mod checkpoint;

/// Training accuracy
pub mod metrics;
