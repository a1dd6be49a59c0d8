// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe what flows through the bridge:
// the request/response envelope, the train and predict payloads,
// the engine abstraction and the engine error type.
//
// Rules for this layer:
//   - NO tree or boosting code here
//   - NO stdin/stdout access
//   - Only structs, enums and traits
//
// The envelope types derive serde traits so the dispatcher can
// move between raw JSON and typed values without hand parsing.
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

// Request / response envelope and the command mapping
pub mod envelope;

// Train and predict payloads and their results
pub mod payload;

// The pluggable classifier engine abstraction
pub mod traits;

// Typed errors raised below the application layer
pub mod error;
