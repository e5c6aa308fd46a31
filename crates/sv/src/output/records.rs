//! Record output formatting.

use serde::Serialize;
use serde_json::Value;

use super::helpers::{format_cell, push_header, to_json, truncate_str, MAX_COLUMN_WIDTH};

/// JSON output structure for matching records.
#[derive(Serialize)]
pub struct RecordsOutput<'a> {
    pub matched: usize,
    pub total: usize,
    pub records: &'a [&'a Value],
}

/// JSON output structure for a count.
#[derive(Serialize)]
pub struct CountOutput {
    pub matched: usize,
    pub total: usize,
}

/// Formats matching records as JSON.
///
/// `matched` may exceed `records.len()` when a limit was applied.
pub fn format_records_json(
    records: &[&Value],
    matched: usize,
    total: usize,
    pretty: bool,
) -> Result<String, serde_json::Error> {
    to_json(
        &RecordsOutput {
            matched,
            total,
            records,
        },
        pretty,
    )
}

/// Formats a match count as JSON.
pub fn format_count_json(matched: usize, total: usize, pretty: bool) -> Result<String, serde_json::Error> {
    to_json(&CountOutput { matched, total }, pretty)
}

/// Collects the keys of `records` in first-seen order.
pub fn record_columns(records: &[&Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

/// Formats records as a table with the given columns.
pub fn format_records_table(
    records: &[&Value],
    columns: &[String],
    matched: usize,
    total: usize,
    use_colors: bool,
) -> String {
    if records.is_empty() {
        return "No matching records.\n".to_string();
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| truncate_str(&format_cell(record.get(column)), MAX_COLUMN_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let mut output = String::new();

    // Header
    let header = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", truncate_str(column, *width)))
        .collect::<Vec<_>>()
        .join("  ");
    push_header(&mut output, header.trim_end(), use_colors);

    // Rows
    for row in &rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output.push_str(&format!(
        "\n{} of {} record(s) matched",
        matched, total
    ));
    if records.len() < matched {
        output.push_str(&format!(", showing {}", records.len()));
    }
    output.push('\n');

    output
}
