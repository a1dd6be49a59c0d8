// ============================================================
// Layer 2 — Command Dispatcher
// ============================================================
// One request in, one response out:
//
//   raw text ──parse──▶ Request ──lookup──▶ Command
//                                            │
//                     ┌──────────────────────┴───────────────┐
//                     ▼                                      ▼
//               TrainUseCase                          PredictUseCase
//                     │                                      │
//                     └──────────────▶ Response ◀────────────┘
//
// Nothing escapes as a panic or a non-JSON answer: a parse
// failure, an unknown command and every operation error all end
// up as `{"success": false, "error": "..."}`.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::application::{
    predict_use_case::PredictUseCase,
    train_use_case::{BoostConfig, TrainUseCase},
};
use crate::domain::envelope::{Command, OperationOutput, Request, Response};
use crate::ml::engine::GbdtEngine;

pub struct Dispatcher {
    config: BoostConfig,
}

impl Dispatcher {
    pub fn new(config: BoostConfig) -> Self {
        Self { config }
    }

    /// Parse `input` as a request and run it.
    pub fn handle_input(&self, input: &str) -> Response {
        match serde_json::from_str::<Request>(input) {
            Ok(request) => self.handle(request),
            Err(e) => {
                tracing::warn!("Rejected input: {}", e);
                Response::failure(format!("invalid request JSON: {e}"))
            }
        }
    }

    pub fn handle(&self, request: Request) -> Response {
        let Some(command) = Command::lookup(&request.command) else {
            tracing::warn!("Unknown command: {}", request.command);
            return Response::unknown_command();
        };

        tracing::debug!("Dispatching `{}`", command.name());
        match self.run(command, request.payload) {
            Ok(output) => Response::ok(output),
            Err(e) => {
                tracing::warn!("`{}` failed: {:#}", command.name(), e);
                Response::failure(format!("{e:#}"))
            }
        }
    }

    fn run(&self, command: Command, payload: Value) -> Result<OperationOutput> {
        let engine = GbdtEngine::new(self.config.clone());
        match command {
            Command::Train => {
                let payload = parse_payload(payload, command)?;
                Ok(OperationOutput::Trained(TrainUseCase::new(engine).execute(payload)?))
            }
            Command::Predict => {
                let payload = parse_payload(payload, command)?;
                Ok(OperationOutput::Predicted(PredictUseCase::new(engine).execute(payload)?))
            }
        }
    }
}

fn parse_payload<T: DeserializeOwned>(payload: Value, command: Command) -> Result<T> {
    serde_json::from_value(payload).with_context(|| format!("invalid {} payload", command.name()))
}
