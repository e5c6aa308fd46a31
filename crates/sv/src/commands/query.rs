//! Query command implementation.
//!
//! Runs a filter against the records file through the repository:
//! validate, compile to a Mongo-style document, evaluate.

use serde_json::Value;
use sieve_core::Schema;
use sieve_store::{Repository, RepositoryError};

use super::{diagnose, read_json_arg, CommandContext, CommandError, Result, Settings};
use crate::output::{format_count_json, format_records_json, format_records_table, record_columns};

/// Options for the query command.
#[derive(Debug, Default)]
pub struct QueryOptions {
    /// Filter as JSON, or `@path`; `None` matches everything.
    pub filter: Option<String>,
    /// Print only the number of matches.
    pub count: bool,
    /// Show at most this many records.
    pub limit: Option<usize>,
}

/// Executes the query command.
///
/// # Errors
///
/// Returns an error if either file cannot be loaded, the filter is invalid,
/// or evaluation fails.
pub fn execute(ctx: &CommandContext, settings: &Settings, opts: &QueryOptions) -> Result<()> {
    let repo = Repository::open(settings.schema_path()?, settings.records_path()?)?;
    if ctx.verbose {
        eprintln!("Loaded {} record(s)", repo.len());
    }

    let matched = match &opts.filter {
        Some(arg) => repo.find_json(&read_json_arg(arg)?),
        None => repo.find(None),
    }
    .map_err(|err| match err {
        RepositoryError::Validation(errors) => {
            CommandError::Validation(diagnose(repo.schema(), errors))
        }
        other => other.into(),
    })?;

    let columns = schema_columns(repo.schema(), &matched);
    print_records(ctx, &matched, &columns, repo.len(), opts.count, opts.limit)
}

/// Prints matching records (or just their count) in the requested format.
pub(crate) fn print_records(
    ctx: &CommandContext,
    matched: &[&Value],
    columns: &[String],
    total: usize,
    count: bool,
    limit: Option<usize>,
) -> Result<()> {
    if count {
        if ctx.json_output {
            println!("{}", format_count_json(matched.len(), total, ctx.pretty)?);
        } else {
            println!("{}", matched.len());
        }
        return Ok(());
    }

    let shown = apply_limit(matched, limit);

    if ctx.json_output {
        println!(
            "{}",
            format_records_json(shown, matched.len(), total, ctx.pretty)?
        );
    } else if !ctx.quiet {
        print!(
            "{}",
            format_records_table(shown, columns, matched.len(), total, ctx.use_colors)
        );
    }

    Ok(())
}

/// Applies the limit to the records.
fn apply_limit<'a, 'b>(records: &'a [&'b Value], limit: Option<usize>) -> &'a [&'b Value] {
    match limit {
        Some(limit) if limit < records.len() => &records[..limit],
        _ => records,
    }
}

/// Table columns: schema fields in declaration order, then any other keys.
fn schema_columns(schema: &Schema, records: &[&Value]) -> Vec<String> {
    let mut columns: Vec<String> = schema.fields().iter().map(|f| f.name.clone()).collect();
    for key in record_columns(records) {
        if !columns.contains(&key) {
            columns.push(key);
        }
    }
    columns
}
