//! Validation output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;

use crate::commands::Diagnostic;

use super::helpers::to_json;

/// JSON output structure for a valid filter.
#[derive(Serialize)]
pub struct ValidOutput {
    pub valid: bool,
    pub conditions: usize,
}

/// Formats a successful validation as JSON.
pub fn format_valid_json(conditions: usize, pretty: bool) -> Result<String, serde_json::Error> {
    to_json(
        &ValidOutput {
            valid: true,
            conditions,
        },
        pretty,
    )
}

/// Formats a successful validation as text.
pub fn format_valid_table(conditions: usize, use_colors: bool) -> String {
    let status = "Filter is valid";
    let status = if use_colors {
        status.green().to_string()
    } else {
        status.to_string()
    };
    match conditions {
        0 => format!("{status} (matches everything)\n"),
        1 => format!("{status} (1 condition)\n"),
        n => format!("{status} ({n} conditions)\n"),
    }
}

/// Formats validation diagnostics, one per line, for stderr.
pub fn format_diagnostics(diagnostics: &[Diagnostic], use_colors: bool) -> String {
    let mut output = String::new();

    for diagnostic in diagnostics {
        let path = if use_colors {
            diagnostic.path.yellow().to_string()
        } else {
            diagnostic.path.clone()
        };
        output.push_str(&format!("  {path}: {}", diagnostic.message));
        if let Some(ref hint) = diagnostic.hint {
            output.push_str(&format!(" (did you mean \"{hint}\"?)"));
        }
        output.push('\n');
    }

    output
}
