//! Command implementations for the sv CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod compile;
pub mod completions;
pub mod config;
pub mod eval;
pub mod query;
pub mod schema;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use sieve_core::{EngineError, QueryTarget, Schema, ValidationError};
use sieve_store::{RepositoryError, StoreError};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The filter failed validation.
    #[error("filter is invalid ({} error(s))", .0.len())]
    Validation(Vec<Diagnostic>),

    /// Compile or evaluate precondition fault.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Schema or records file error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<RepositoryError> for CommandError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Validation(errors) => {
                CommandError::Validation(errors.into_iter().map(Diagnostic::from).collect())
            }
            RepositoryError::Engine(err) => CommandError::Engine(err),
        }
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// A validation fault as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: String,
    pub message: String,
    /// Closest schema field for an unknown field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl From<ValidationError> for Diagnostic {
    fn from(err: ValidationError) -> Self {
        Self {
            path: err.path,
            message: err.message,
            hint: None,
        }
    }
}

/// Converts validation errors to diagnostics, adding "did you mean" hints.
pub fn diagnose(schema: &Schema, errors: Vec<ValidationError>) -> Vec<Diagnostic> {
    errors
        .into_iter()
        .map(|err| {
            let hint = err
                .unknown_field
                .as_deref()
                .and_then(|field| schema.suggest(field))
                .map(str::to_string);
            Diagnostic {
                hint,
                ..Diagnostic::from(err)
            }
        })
        .collect()
}

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Whether JSON output is pretty-printed.
    pub pretty: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the config file.
    pub fn new(cli: &Cli, config: &Config) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
            verbose: cli.verbose,
            pretty: config.output.pretty.unwrap_or(true),
        }
    }

    /// Serializes a value as JSON honoring the `pretty` setting.
    pub fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(crate::output::helpers::to_json(value, self.pretty)?)
    }
}

/// Files and defaults resolved from flags, environment and config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub schema: Option<PathBuf>,
    pub records: Option<PathBuf>,
    pub target: QueryTarget,
}

impl Settings {
    /// Resolves settings with priority: flag/env > config > built-in default.
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let target = match config.target.as_deref() {
            Some(name) => name.parse().map_err(|e: EngineError| {
                CommandError::Config(format!("invalid target in config: {e}"))
            })?,
            None => QueryTarget::Mongo,
        };

        Ok(Self {
            schema: cli.schema.clone().or_else(|| config.schema.clone()),
            records: cli.records.clone().or_else(|| config.records.clone()),
            target,
        })
    }

    /// The schema file, or an error explaining how to provide one.
    pub fn schema_path(&self) -> Result<&Path> {
        self.schema.as_deref().ok_or_else(|| {
            CommandError::Config(
                "no schema file given; pass --schema or run 'sv config set schema <path>'"
                    .to_string(),
            )
        })
    }

    /// The records file, or an error explaining how to provide one.
    pub fn records_path(&self) -> Result<&Path> {
        self.records.as_deref().ok_or_else(|| {
            CommandError::Config(
                "no records file given; pass --records or run 'sv config set records <path>'"
                    .to_string(),
            )
        })
    }
}

/// Reads a JSON argument: inline text, or `@path` for a file.
pub fn read_json_arg(arg: &str) -> Result<Value> {
    let text = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)?,
        None => arg.to_string(),
    };
    Ok(serde_json::from_str(&text)?)
}
