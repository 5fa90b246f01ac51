//! nugetcfg: structure-preserving editor for nuget.config files.
//!
//! This is the main entry point for the `nugetcfg` CLI. It parses arguments,
//! loads settings, installs logging, dispatches to the appropriate command
//! handler, and handles errors with proper exit codes.

mod cli;
mod commands;
pub mod config;
pub mod discovery;
pub mod edit;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod journal;
pub mod model;
pub mod parser;
pub mod redact;
pub mod schema;
pub mod serialize;
pub mod session;
pub mod validate;
pub mod xml;

use cli::Cli;
use config::Settings;
use error::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable that overrides the `log_level` setting.
const LOG_ENV: &str = "NUGETCFG_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let result = load_settings(&cli).and_then(|settings| {
        init_logging(&settings);
        commands::dispatch(cli.command, &settings)
    });

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir().map_err(|e| {
        error::NugetError::IoError(format!("cannot determine current directory: {}", e))
    })?;
    Settings::discover(cli.settings.as_deref(), &cwd)
}

/// Log to stderr; stdout carries command output and the serve protocol.
fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("nugetcfg={}", settings.log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
