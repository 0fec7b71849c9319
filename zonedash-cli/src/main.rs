//! `zonedash` entry point.
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable.
//! Library crates log through `log`; the subscriber bridges those records.

mod adapters;
mod cli;
mod commands;
mod config;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use zonedash_core::Outcome;

use cli::Cli;

fn init_tracing(quiet: bool, verbose: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false)
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.is_quiet, cli.global.is_verbose);

    match cli.run().await {
        Ok(Outcome::Succeeded) => ExitCode::SUCCESS,
        Ok(outcome) => {
            tracing::debug!("Command ended with {outcome:?}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
