//! Compile command implementation.
//!
//! Validates a filter, then compiles it to a Mongo-style document or a
//! parameterized SQL clause.

use sieve_core::{FilterEngine, QueryTarget};
use sieve_store::load_schema;

use super::validate::check_filter;
use super::{CommandContext, Result, Settings};
use crate::output::{format_compiled_json, format_compiled_table};

/// Options for the compile command.
#[derive(Debug)]
pub struct CompileOptions {
    /// Filter as JSON, or `@path`.
    pub filter: String,
    /// Target override; falls back to the configured target.
    pub target: Option<QueryTarget>,
}

/// Executes the compile command.
///
/// # Errors
///
/// Returns an error if the filter is invalid or compilation fails.
pub fn execute(ctx: &CommandContext, settings: &Settings, opts: &CompileOptions) -> Result<()> {
    let engine = FilterEngine::new(load_schema(settings.schema_path()?)?);
    let filter = check_filter(&engine, &opts.filter)?;

    let target = opts.target.unwrap_or(settings.target);
    if ctx.verbose {
        eprintln!("Compiling for {target}...");
    }
    let compiled = target.compile(filter.as_ref())?;

    if ctx.json_output {
        println!("{}", format_compiled_json(&compiled, ctx.pretty)?);
    } else if !ctx.quiet {
        print!("{}", format_compiled_table(&compiled, ctx.use_colors)?);
    }

    Ok(())
}
