//! Schema command implementation.

use sieve_store::load_schema;

use super::{CommandContext, Result, Settings};
use crate::output::{format_schema_json, format_schema_table};

/// Executes the schema command, listing fields and their operators.
///
/// # Errors
///
/// Returns an error if the schema file cannot be loaded.
pub fn execute(ctx: &CommandContext, settings: &Settings) -> Result<()> {
    let schema = load_schema(settings.schema_path()?)?;

    if ctx.json_output {
        println!("{}", format_schema_json(&schema, ctx.pretty)?);
    } else if !ctx.quiet {
        print!("{}", format_schema_table(&schema, ctx.use_colors));
    }

    Ok(())
}
