//! Eval command implementation.
//!
//! Evaluates an already-compiled Mongo-style query document against the
//! records file, without a schema.

use sieve_core::query::QueryEvaluator;
use sieve_core::MongoQuery;
use sieve_store::load_records;

use super::query::print_records;
use super::{read_json_arg, CommandContext, Result, Settings};
use crate::output::record_columns;

/// Options for the eval command.
#[derive(Debug)]
pub struct EvalOptions {
    /// Query document as JSON, or `@path`.
    pub query: String,
    /// Print only the number of matches.
    pub count: bool,
}

/// Executes the eval command.
///
/// # Errors
///
/// Returns an error if the records or query cannot be read, or if the query
/// uses an unsupported operator or a malformed shape.
pub fn execute(ctx: &CommandContext, settings: &Settings, opts: &EvalOptions) -> Result<()> {
    let records = load_records(settings.records_path()?)?;
    let query = MongoQuery::try_from(read_json_arg(&opts.query)?)?;

    let matched = QueryEvaluator::new(&query).filter_records(&records)?;
    let columns = record_columns(&matched);
    print_records(ctx, &matched, &columns, records.len(), opts.count, None)
}
