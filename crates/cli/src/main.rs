//! `azdo-endpoint` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: organisation URL, token, API version, and
//!    timeout from flags or the `AZDO_*` environment variables.
//! 2. **Wire observability**: `tracing-subscriber` on stderr (text or JSON),
//!    plus an OpenTelemetry OTLP exporter when `OTEL_EXPORTER_OTLP_ENDPOINT`
//!    is set.
//! 3. **Construct infrastructure**: the `AzureDevOpsClient` REST adapter,
//!    handed to the GitHub service connection resource's callbacks.
//! 4. **Dispatch**: run one lifecycle operation on a state document read from
//!    a file or stdin, and print the resulting state to stdout.

mod args;
mod commands;
mod observability;

use std::process::ExitCode;

use clap::Parser;

use crate::args::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = match observability::init(cli.log_format) {
        Ok(telemetry) => telemetry,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = commands::run(&cli).await;
    telemetry.shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
