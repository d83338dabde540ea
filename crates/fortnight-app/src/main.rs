//! Fortnight - prints whether the recurring window is open, as JSON.
//!
//! Exit status is 0 on success, 2 when the configuration is rejected and 1 for
//! other failures. Error envelopes are printed to stdout either way.

use std::process::ExitCode;

use clap::Parser;
use fortnight_app::{evaluate, to_json, AppError, Args, ErrorResponse, SystemClock};
use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr so stdout carries only the JSON envelope.
fn init_logging(args: &Args) {
    let log_level = args.log_level();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "fortnight={0},fortnight_app={0},fortnight_core={0},warn",
            log_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(&args);

    tracing::debug!("Args: {:?}", args);

    match evaluate(&args, &SystemClock) {
        Ok(report) => {
            println!("{}", to_json(&report, args.pretty)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(AppError::Json(err)) => Err(err.into()),
        Err(err) => {
            tracing::error!("Evaluation failed: {}", err);
            println!("{}", to_json(&ErrorResponse::from(&err), args.pretty)?);
            Ok(ExitCode::from(err.exit_code()))
        }
    }
}
