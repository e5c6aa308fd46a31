//! Compiled query output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use sieve_core::CompiledQuery;

use super::helpers::to_json;

/// JSON output structure for a compiled query.
#[derive(Serialize)]
pub struct CompiledOutput<'a> {
    pub target: &'static str,
    pub query: &'a CompiledQuery,
}

/// Formats a compiled query as JSON, tagged with its target.
pub fn format_compiled_json(
    compiled: &CompiledQuery,
    pretty: bool,
) -> Result<String, serde_json::Error> {
    let output = CompiledOutput {
        target: compiled.target().as_str(),
        query: compiled,
    };
    to_json(&output, pretty)
}

/// Formats a compiled query for reading.
///
/// Mongo documents print as indented JSON; SQL prints the clause and its
/// parameters on separate lines.
pub fn format_compiled_table(
    compiled: &CompiledQuery,
    use_colors: bool,
) -> Result<String, serde_json::Error> {
    match compiled {
        CompiledQuery::Mongo(query) => Ok(format!("{}\n", to_json(query, true)?)),
        CompiledQuery::Sql(query) => {
            let (where_label, params_label) = if use_colors {
                ("WHERE".dimmed().to_string(), "Params".dimmed().to_string())
            } else {
                ("WHERE".to_string(), "Params".to_string())
            };
            Ok(format!(
                "{where_label} {}\n{params_label}: {}\n",
                query.sql,
                to_json(&query.params, false)?
            ))
        }
    }
}
