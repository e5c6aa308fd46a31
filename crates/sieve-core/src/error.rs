//! Error types for the filter engine.
//!
//! Validation faults are plain data (see [`crate::filter::ValidationError`]).
//! The types here cover the other class: precondition faults raised while
//! compiling or evaluating, and configuration faults raised while building a
//! [`crate::Schema`].

use thiserror::Error;

/// A specialized Result type for compile and evaluate operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Fatal errors raised by the compilers, the evaluator and the target registry.
///
/// Reaching one of these means a caller skipped validation or handed the
/// engine a corrupt compiled query. Transport layers should map them to a
/// server-side failure, unlike validation faults.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// No compiler is registered under the requested name.
    #[error("unknown query target: {name} (expected one of: mongo, sql)")]
    UnknownTarget {
        /// The requested target name.
        name: String,
    },

    /// A compiled query used an operator the evaluator does not implement.
    #[error("unsupported operator in compiled query: {operator}")]
    UnsupportedOperator {
        /// The unrecognized operator key.
        operator: String,
    },

    /// A compiled query document has the wrong shape.
    #[error("malformed compiled query: {message}")]
    MalformedQuery {
        /// What was wrong with the document.
        message: String,
    },

    /// A `$regex` pattern failed to compile.
    #[error("invalid regular expression {pattern:?}: {message}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// The regex engine's diagnostic.
        message: String,
    },

    /// A condition reached a compiler with a value its operator cannot use.
    #[error("cannot compile operator \"{operator}\" on field \"{field}\": {message}")]
    InvalidValue {
        /// The condition's field.
        field: String,
        /// The condition's operator.
        operator: String,
        /// What the operator expected.
        message: String,
    },
}

impl EngineError {
    /// Creates an unknown target error.
    pub fn unknown_target(name: impl Into<String>) -> Self {
        EngineError::UnknownTarget { name: name.into() }
    }

    /// Creates an unsupported operator error.
    pub fn unsupported_operator(operator: impl Into<String>) -> Self {
        EngineError::UnsupportedOperator {
            operator: operator.into(),
        }
    }

    /// Creates a malformed query error.
    pub fn malformed(message: impl Into<String>) -> Self {
        EngineError::MalformedQuery {
            message: message.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(
        field: impl Into<String>,
        operator: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        EngineError::InvalidValue {
            field: field.into(),
            operator: operator.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while assembling a schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Two descriptors share a name.
    #[error("duplicate field in schema: {name}")]
    DuplicateField {
        /// The repeated field name.
        name: String,
    },

    /// A descriptor has an empty name.
    #[error("schema field names must not be empty")]
    EmptyFieldName,

    /// A descriptor name starts with `$`, which query documents reserve for operators.
    #[error("field name \"{name}\" must not start with '$'")]
    ReservedFieldName {
        /// The rejected field name.
        name: String,
    },

    /// `enum_values` was set on a field whose type is not `enum`.
    #[error("field \"{name}\" declares enum values but has type {field_type}")]
    UnexpectedEnumValues {
        /// The field name.
        name: String,
        /// The declared type.
        field_type: String,
    },
}
