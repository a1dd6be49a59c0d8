// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Process boundary of the bridge:
//
//   1. read one JSON request from stdin (or --input <file>)
//   2. hand it to the dispatcher               (Layer 2)
//   3. print the response as one JSON line on stdout
//   4. pick the exit status
//
// The exit status is 0 whatever the outcome; callers read
// `success` from the JSON. --fail-exit-code opts into exit 1
// for failed requests.
//
// Logs go to stderr (see main.rs); stdout carries only the
// response.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Hyperparameter flags
pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::BoostArgs;
use std::{fs::File, io::{self, Read, Write}, process::ExitCode};

use crate::application::dispatcher::Dispatcher;
use crate::domain::envelope::Response;

/// Reads a {"command", "payload"} request and answers with a
/// {"success", "data" | "error"} envelope.
#[derive(Parser, Debug)]
#[command(
    name = "gbdt-bridge",
    version,
    about = "Train and run a gradient-boosted classifier over a JSON stdin/stdout bridge."
)]
pub struct Cli {
    /// Request file; `-` reads stdin
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Pretty-print the response JSON
    #[arg(long)]
    pub pretty: bool,

    /// Exit with status 1 when the response has success=false
    #[arg(long)]
    pub fail_exit_code: bool,

    /// Debug-level logs on stderr
    #[arg(long, short)]
    pub verbose: bool,

    #[command(flatten)]
    pub boost: BoostArgs,
}

impl Cli {
    pub fn run(self) -> Result<ExitCode> {
        let input = self.open_input();
        let (_, status) = self.serve(input, &mut io::stdout().lock())?;
        Ok(ExitCode::from(status))
    }

    fn open_input(&self) -> Result<Box<dyn Read>> {
        if self.input == "-" {
            return Ok(Box::new(io::stdin()));
        }
        let file = File::open(&self.input).with_context(|| format!("failed to read {}", self.input))?;
        Ok(Box::new(file))
    }

    /// Answer one request read from `input` with one JSON line on
    /// `out`. Returns the response and the process exit status.
    fn serve(&self, input: Result<impl Read>, out: &mut impl Write) -> Result<(Response, u8)> {
        let dispatcher = Dispatcher::new(self.boost.clone().into());

        let text = input.and_then(|reader| io::read_to_string(reader).context("failed to read input"));
        let response = match text {
            Ok(text) => dispatcher.handle_input(&text),
            Err(e) => {
                tracing::warn!("{:#}", e);
                Response::failure(format!("{e:#}"))
            }
        };

        let line = if self.pretty {
            serde_json::to_string_pretty(&response)?
        } else {
            serde_json::to_string(&response)?
        };
        writeln!(out, "{line}").context("failed to write response")?;
        out.flush().context("failed to write response")?;

        let status = self.exit_status(&response);
        Ok((response, status))
    }

    fn exit_status(&self, response: &Response) -> u8 {
        if self.fail_exit_code && !response.success { 1 } else { 0 }
    }
}
