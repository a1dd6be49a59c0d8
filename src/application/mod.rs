// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Turns one request into one response by coordinating the
// other layers.
//
// Rules for this layer:
//   - No boosting math here (Layer 5)
//   - No printing or process exit codes (Layer 1)
//   - Errors are anyhow::Result with context; only the
//     dispatcher turns them into response envelopes
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Request → use case → response envelope
pub mod dispatcher;

// The `train` workflow
pub mod train_use_case;

// The `predict` workflow
pub mod predict_use_case;
