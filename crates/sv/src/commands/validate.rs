//! Validate command implementation.
//!
//! Decodes a filter and checks it against the schema, reporting every fault.

use sieve_core::{FilterEngine, FilterNode};
use sieve_store::load_schema;

use super::{diagnose, read_json_arg, CommandContext, CommandError, Result, Settings};
use crate::output::{format_valid_json, format_valid_table};

/// Options for the validate command.
#[derive(Debug)]
pub struct ValidateOptions {
    /// Filter as JSON, or `@path`.
    pub filter: String,
}

/// Executes the validate command.
///
/// # Errors
///
/// Returns `CommandError::Validation` with every fault if the filter is
/// invalid, or an error if the schema or filter cannot be read.
pub fn execute(ctx: &CommandContext, settings: &Settings, opts: &ValidateOptions) -> Result<()> {
    let engine = FilterEngine::new(load_schema(settings.schema_path()?)?);
    let filter = check_filter(&engine, &opts.filter)?;
    let conditions = filter.as_ref().map_or(0, FilterNode::condition_count);

    if ctx.json_output {
        println!("{}", format_valid_json(conditions, ctx.pretty)?);
    } else if !ctx.quiet {
        print!("{}", format_valid_table(conditions, ctx.use_colors));
    }

    Ok(())
}

/// Reads a filter argument and validates it against the engine's schema.
///
/// Returns `None` for a JSON `null` filter (match everything).
pub(crate) fn check_filter(engine: &FilterEngine, arg: &str) -> Result<Option<FilterNode>> {
    let value = read_json_arg(arg)?;
    engine
        .validate_json(&value)
        .map_err(|errors| CommandError::Validation(diagnose(engine.schema(), errors)))
}
