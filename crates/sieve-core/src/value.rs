//! Helpers for interpreting JSON values as typed field values.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use uuid::{Uuid, Variant};

/// Naive datetime layouts accepted in addition to RFC 3339.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Length of the canonical hyphenated UUID form.
const HYPHENATED_UUID_LEN: usize = 36;

/// Parses a date string into a UTC timestamp.
///
/// Accepts RFC 3339 (`2023-01-01T10:00:00Z`, with offset), naive datetimes
/// (`2023-01-01T10:00:00`, `2023-01-01 10:00:00`), and plain dates
/// (`2023-01-01`, read as midnight UTC).
pub(crate) fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Returns true for hyphenated RFC 4122 UUIDs (versions 1 through 5).
pub(crate) fn is_rfc4122_uuid(s: &str) -> bool {
    if s.len() != HYPHENATED_UUID_LEN {
        return false;
    }

    match Uuid::parse_str(s) {
        Ok(id) => (1..=5).contains(&id.get_version_num()) && id.get_variant() == Variant::RFC4122,
        Err(_) => false,
    }
}

/// Strict equality with numeric normalisation (`30` equals `30.0`).
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Orders two values of the same kind.
///
/// Numbers compare numerically, strings that both parse as dates compare
/// chronologically, other strings lexicographically, booleans `false < true`.
/// Values of different kinds are unordered.
pub(crate) fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => match (parse_date(x), parse_date(y)) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => Some(x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Renders a scalar as the text used in LIKE patterns and regexes.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
