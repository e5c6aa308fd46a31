//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

/// Widest a table column may grow.
pub const MAX_COLUMN_WIDTH: usize = 24;

/// Truncates a string to a maximum length (in characters).
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Renders a record value as a table cell; null and missing show as "-".
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Serializes a value, pretty-printed or compact.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Appends a header line, dimmed when colors are on.
pub fn push_header(output: &mut String, header: &str, use_colors: bool) {
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(header);
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_str_short() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_str_exact() {
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_long() {
        assert_eq!(truncate_str("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(None), "-");
        assert_eq!(format_cell(Some(&Value::Null)), "-");
        assert_eq!(format_cell(Some(&json!("Alice"))), "Alice");
        assert_eq!(format_cell(Some(&json!(34))), "34");
        assert_eq!(format_cell(Some(&json!(true))), "true");
        assert_eq!(format_cell(Some(&json!(["a", "b"]))), r#"["a","b"]"#);
    }

    #[test]
    fn test_to_json_compact_and_pretty() {
        let value = json!({"a": 1});
        assert_eq!(to_json(&value, false).unwrap(), r#"{"a":1}"#);
        assert_eq!(to_json(&value, true).unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_push_header_plain() {
        let mut out = String::new();
        push_header(&mut out, "Name  Age", false);
        assert_eq!(out, "Name  Age\n");
    }
}
