//! ipwatch: public IP change monitor
//!
//! Entry point for the ipwatch application.

use ipwatch::config::{Cli, Command, MonitorConfig, write_default_config};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Handle init subcommand
    if let Some(Command::Init { output }) = &cli.command {
        return handle_init(output);
    }

    // Logging first: configuration problems are reported as warnings
    let _log_guard = setup_tracing(cli.verbose, cli.log_file());

    let config = match MonitorConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return exit_code::CONFIG_ERROR;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    if cli.is_check() {
        return run_check(&runtime, &config);
    }

    tracing::info!("{config}");
    let stats = runtime.block_on(run::execute(config));
    tracing::debug!("{stats:?}");
    exit_code::SUCCESS
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Handles the `check` subcommand.
///
/// Excluded from coverage - requires network access.
#[cfg(not(tarpaulin_include))]
fn run_check(runtime: &tokio::runtime::Runtime, config: &MonitorConfig) -> ExitCode {
    match runtime.block_on(run::check(config)) {
        Ok(address) => {
            println!("{address}");
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::runtime_error()
        }
    }
}
