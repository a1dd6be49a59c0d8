// ============================================================
// Layer 3 — Model Errors
// ============================================================
// Every failure the data, ml and infra layers can produce.
// The application layer wraps these in anyhow::Error with
// context; the dispatcher finally renders them as the
// `error` string of the response envelope.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Shape or value problems in X / y
    #[error("{0}")]
    InvalidInput(String),

    /// Prediction rows do not match the trained feature space
    #[error("X has {found} features, but the model is expecting {expected} features as input")]
    FeatureMismatch { expected: usize, found: usize },

    /// A hyperparameter outside its valid range
    #[error("invalid hyperparameter: {0}")]
    InvalidConfig(String),

    #[error("model blob is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("model blob could not be decoded: {0}")]
    Codec(#[from] bincode::Error),

    /// Bytes decoded fine but were not produced by this engine
    #[error("model blob was not produced by this engine")]
    ForeignBlob,

    #[error("model blob format version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Structurally invalid model (e.g. a tree child out of range)
    #[error("model blob is corrupt: {0}")]
    Corrupt(String),
}

impl ModelError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
