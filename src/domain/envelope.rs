// ============================================================
// Layer 3 — Request / Response Envelope
// ============================================================
// Wire shapes of the single JSON document read from stdin and
// the single JSON document written to stdout:
//
//   in:  {"command": "train" | "predict", "payload": {...}}
//   out: {"success": true,  "data":  {...}}
//        {"success": false, "error": "..."}
//
// `command` is kept as a raw JSON value so that a missing or
// non-string command is reported as "Unknown command" rather
// than as a parse error. A missing `payload` becomes `{}` and
// the operation's own validation reports what is absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::payload::{PredictResult, TrainResult};

/// Error string returned when `command` is not one of the known operations
pub const UNKNOWN_COMMAND: &str = "Unknown command";

/// One request read from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub command: Value,

    #[serde(default = "empty_object")]
    pub payload: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// The fixed mapping of command names to operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Train,
    Predict,
}

impl Command {
    /// Look up a command name. Anything else (including a missing
    /// or non-string command) maps to None.
    pub fn lookup(command: &Value) -> Option<Self> {
        match command.as_str()? {
            "train"   => Some(Self::Train),
            "predict" => Some(Self::Predict),
            _         => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Train   => "train",
            Self::Predict => "predict",
        }
    }
}

/// Result data of a successful operation.
/// Untagged so `data` carries the result object directly.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Trained(TrainResult),
    Predicted(PredictResult),
}

/// The response envelope. Exactly one of `data` / `error` is present.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<OperationOutput>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok(data: OperationOutput) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }

    pub fn unknown_command() -> Self {
        Self::failure(UNKNOWN_COMMAND)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_payload_defaults_to_empty_object() {
        let req: Request = serde_json::from_str(r#"{"command":"train"}"#).unwrap();
        assert_eq!(req.payload, json!({}));
    }

    #[test]
    fn test_explicit_null_payload_is_kept() {
        // Only an absent payload is replaced; null must still fail validation later
        let req: Request = serde_json::from_str(r#"{"command":"train","payload":null}"#).unwrap();
        assert_eq!(req.payload, Value::Null);
    }

    #[test]
    fn test_command_lookup() {
        assert_eq!(Command::lookup(&json!("train")),   Some(Command::Train));
        assert_eq!(Command::lookup(&json!("predict")), Some(Command::Predict));
        assert_eq!(Command::lookup(&json!("Train")),   None);
        assert_eq!(Command::lookup(&json!(7)),         None);
        assert_eq!(Command::lookup(&Value::Null),      None);
    }

    #[test]
    fn test_failure_envelope_shape() {
        let out = serde_json::to_value(Response::unknown_command()).unwrap();
        assert_eq!(out, json!({"success": false, "error": "Unknown command"}));
    }

    #[test]
    fn test_success_envelope_shape() {
        let resp = Response::ok(OperationOutput::Predicted(PredictResult {
            probabilities: vec![0.25, 0.75],
        }));
        let out = serde_json::to_value(resp).unwrap();
        assert_eq!(out, json!({"success": true, "data": {"probabilities": [0.25, 0.75]}}));
    }
}
