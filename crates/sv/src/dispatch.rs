//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands split in two: standalone ones (config, completions, help) run
//! without any data files, dataset ones need the schema and/or records
//! resolved into [`Settings`] first.

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::{self, CommandContext, CommandError, Result, Settings};

/// Trait for commands that run without data files.
pub trait StandaloneCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that read the schema or records.
pub trait DatasetCommand {
    /// Execute the command with resolved file settings.
    fn execute(&self, ctx: &CommandContext, settings: &Settings) -> Result<()>;
}

/// Commands that don't need data files.
pub enum StandaloneDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> StandaloneDispatch<'a> {
    /// Try to create a standalone dispatch from the CLI command.
    /// Returns None if the command needs data files.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl StandaloneCommand for StandaloneDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("sv - schema-checked filters");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that need the schema and/or records.
pub enum DatasetDispatch<'a> {
    Validate {
        filter: &'a str,
    },
    Compile {
        filter: &'a str,
        target: Option<crate::cli::Target>,
    },
    Query {
        filter: &'a Option<String>,
        count: bool,
        limit: Option<usize>,
    },
    Eval {
        query: &'a str,
        count: bool,
    },
    Schema,
}

impl<'a> DatasetDispatch<'a> {
    /// Create a dataset dispatch from the CLI command.
    /// Returns None for standalone commands (use StandaloneDispatch first).
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Validate { filter }) => Some(Self::Validate { filter }),
            Some(Commands::Compile { filter, target }) => Some(Self::Compile {
                filter,
                target: *target,
            }),
            Some(Commands::Query {
                filter,
                count,
                limit,
            }) => Some(Self::Query {
                filter,
                count: *count,
                limit: *limit,
            }),
            Some(Commands::Eval { query, count }) => Some(Self::Eval {
                query,
                count: *count,
            }),
            Some(Commands::Schema) => Some(Self::Schema),
            _ => None,
        }
    }
}

impl DatasetCommand for DatasetDispatch<'_> {
    fn execute(&self, ctx: &CommandContext, settings: &Settings) -> Result<()> {
        match self {
            Self::Validate { filter } => {
                let opts = commands::validate::ValidateOptions {
                    filter: filter.to_string(),
                };
                commands::validate::execute(ctx, settings, &opts)
            }
            Self::Compile { filter, target } => {
                let opts = commands::compile::CompileOptions {
                    filter: filter.to_string(),
                    target: target.map(Into::into),
                };
                commands::compile::execute(ctx, settings, &opts)
            }
            Self::Query {
                filter,
                count,
                limit,
            } => {
                let opts = commands::query::QueryOptions {
                    filter: (*filter).clone(),
                    count: *count,
                    limit: *limit,
                };
                commands::query::execute(ctx, settings, &opts)
            }
            Self::Eval { query, count } => {
                let opts = commands::eval::EvalOptions {
                    query: query.to_string(),
                    count: *count,
                };
                commands::eval::execute(ctx, settings, &opts)
            }
            Self::Schema => commands::schema::execute(ctx, settings),
        }
    }
}
