//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which parses arguments, discovers
//! the configuration, sets up logging and the Tokio runtime, and dispatches
//! to the command handlers. All error output happens here.

use clap::Parser;

use super::args::{Cli, Commands};
use super::commands;

use crate::error_reporter::{exit_code_for, render_anyhow};
use crate::{CliArgs, Config, ExitCode};

/// Main CLI execution function.
///
/// Returns `Err(ExitCode)` after the error has been printed; main.rs only
/// calls `std::process::exit(code.as_i32())`.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();
    let cli_args = build_cli_args(&cli);

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", render_anyhow(&err));
            return Err(ExitCode::CLI_ARGS);
        }
    };

    if let Err(e) = catprompt_utils::logging::init_tracing(config.verbose(), cli.json_logs) {
        eprintln!("✗ Failed to initialise logging: {e}");
        return Err(ExitCode::INTERNAL);
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let result = rt.block_on(async {
        match cli.command {
            Commands::Serve { .. } => commands::execute_serve_command(&config).await,
            Commands::Session {
                terminal_clipboard, ..
            } => commands::execute_session_command(&config, terminal_clipboard).await,
            Commands::Generate { with, .. } => {
                commands::execute_generate_command(&config, &with).await
            }
            Commands::Config { json } => commands::execute_config_command(&config, json),
        }
    });

    if let Err(err) = result {
        eprintln!("{}", render_anyhow(&err));
        return Err(exit_code_for(&err));
    }

    Ok(())
}

/// Map parsed arguments onto the configuration layer.
fn build_cli_args(cli: &Cli) -> CliArgs {
    let (listen, relay_url) = match &cli.command {
        Commands::Serve { listen } => (listen.clone(), None),
        Commands::Session { relay_url, .. } | Commands::Generate { relay_url, .. } => {
            (None, relay_url.clone())
        }
        Commands::Config { .. } => (None, None),
    };

    CliArgs {
        config_path: cli.config.clone(),
        listen,
        relay_url,
        model: cli.model.clone(),
        verbose: cli.verbose.then_some(true),
    }
}
