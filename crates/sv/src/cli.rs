//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the sv CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sieve_core::QueryTarget;

/// sv - Validate, compile and run schema-checked filters
#[derive(Parser, Debug)]
#[command(name = "sv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Schema file, TOML or JSON (default: from config)
    #[arg(long, global = true, env = "SV_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Records file, a JSON array of objects (default: from config)
    #[arg(long, global = true, env = "SV_RECORDS")]
    pub records: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a filter against the schema
    #[command(alias = "v")]
    Validate {
        /// Filter as JSON, or @path to read it from a file
        filter: String,
    },

    /// Validate a filter and compile it to a backend query
    #[command(alias = "c")]
    Compile {
        /// Filter as JSON, or @path to read it from a file
        filter: String,

        /// Compile target (default: from config, then mongo)
        #[arg(short, long, value_enum)]
        target: Option<Target>,
    },

    /// Run a filter against the records
    #[command(alias = "q")]
    Query {
        /// Filter as JSON, or @path (default: match everything)
        filter: Option<String>,

        /// Print only the number of matching records
        #[arg(long)]
        count: bool,

        /// Show at most this many records
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Run a compiled Mongo-style query against the records
    Eval {
        /// Query document as JSON, or @path to read it from a file
        query: String,

        /// Print only the number of matching records
        #[arg(long)]
        count: bool,
    },

    /// Show the schema's fields and their operators
    Schema,

    /// View and edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Compile targets
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Mongo,
    Sql,
}

impl From<Target> for QueryTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Mongo => QueryTarget::Mongo,
            Target::Sql => QueryTarget::Sql,
        }
    }
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}
