use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::load_config;
use commands::{CommandContext, CommandError, Settings};
use dispatch::{DatasetCommand, DatasetDispatch, StandaloneCommand, StandaloneDispatch};
use sieve_core::EngineError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", error_json(&e));
            } else {
                eprintln!("Error: {e}");
                if let CommandError::Validation(diagnostics) = &e {
                    eprint!(
                        "{}",
                        output::format_diagnostics(diagnostics, !cli.no_color)
                    );
                }
            }
            error_exit_code(&e)
        }
    }
}

fn run(cli: &Cli) -> commands::Result<()> {
    let config = load_config()?;
    let ctx = CommandContext::new(cli, &config);

    // Standalone commands first (config, completions, help)
    if let Some(dispatch) = StandaloneDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    let settings = Settings::resolve(cli, &config)?;
    log::debug!("resolved settings: {settings:?}");

    match DatasetDispatch::from_cli(cli) {
        Some(dispatch) => dispatch.execute(&ctx, &settings),
        None => Err(CommandError::Config(format!(
            "unhandled command: {:?}",
            cli.command
        ))),
    }
}

/// Sets up logging to stderr; `RUST_LOG` overrides the flag-derived level.
fn init_logger(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Builds the JSON error document written to stderr.
fn error_json(e: &CommandError) -> String {
    let mut error = serde_json::json!({
        "code": error_code(e),
        "message": e.to_string(),
    });
    if let CommandError::Validation(diagnostics) = e {
        error["errors"] = serde_json::json!(diagnostics);
    }

    let document = serde_json::json!({ "error": error });
    serde_json::to_string_pretty(&document).unwrap_or_else(|_| document.to_string())
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Validation(_) => "VALIDATION_ERROR",
        CommandError::Engine(_) => "ENGINE_ERROR",
        CommandError::Store(_) => "STORE_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

/// Numeric exit status: 1 bad input, 2 engine fault, 3 I/O, 5 setup.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Validation(_) => 1,
        CommandError::Engine(EngineError::UnknownTarget { .. }) => 5,
        CommandError::Engine(_) => 2,
        CommandError::Store(err) if err.is_not_found() => 3,
        CommandError::Store(_) => 5,
        CommandError::Config(_) => 5,
        CommandError::Io(_) => 3,
        CommandError::Json(_) => 1,
    }
}
