//! Validation fault types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path segment naming the root of a filter tree.
pub const ROOT_PATH: &str = "<root>";

/// A single problem found while validating a filter.
///
/// Validation never fails fast: every fault in the tree is reported, each
/// tagged with the dotted/indexed path of the offending node, for example
/// `<root>.and[1].value[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Location of the fault within the filter tree.
    pub path: String,

    /// Human-readable description.
    pub message: String,

    /// The offending name, when the field is not declared in the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_field: Option<String>,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            unknown_field: None,
        }
    }

    /// Creates the error reported for a field the schema does not declare.
    pub fn unknown_field(path: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            path: path.into(),
            message: format!("Field \"{field}\" is not allowed for filtering"),
            unknown_field: Some(field),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Returned when parsing an operator name that is not part of the closed set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown operator \"{0}\"")]
pub struct UnknownOperator(pub String);

/// Appends a key segment to a path.
pub(crate) fn key_path(parent: &str, key: &str) -> String {
    format!("{parent}.{key}")
}

/// Appends an index segment to a path.
pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}
