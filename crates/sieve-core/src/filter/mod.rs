//! Filter trees and their validation.
//!
//! A filter is a tree of [`FilterNode`]s:
//!
//! - a [`Condition`] tests one field with one [`Operator`],
//! - a [`Group`] combines children with `and` and/or `or`.
//!
//! Raw JSON from a client is turned into a tree with [`decode`], and a tree is
//! checked against a schema with [`Validator`]. Both report problems as a list
//! of path-tagged [`ValidationError`]s rather than failing on the first one.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sieve_core::filter::{decode, Validator};
//! use sieve_core::{FieldDescriptor, FieldType, Schema};
//!
//! let schema = Schema::new(vec![
//!     FieldDescriptor::new("age", FieldType::Number),
//!     FieldDescriptor::new("createdAt", FieldType::Date).not_filterable(),
//! ])
//! .unwrap();
//!
//! let filter = decode(&json!({
//!     "kind": "condition",
//!     "field": "createdAt",
//!     "operator": "eq",
//!     "value": "2023-01-01"
//! }))
//! .unwrap();
//!
//! let errors = Validator::new(&schema).validate(filter.as_ref());
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].message, "Field \"createdAt\" is not filterable");
//! ```

mod ast;
mod decode;
mod error;
mod validator;

pub use ast::{Condition, FilterNode, Group, Operator};
pub use decode::decode;
pub use error::{UnknownOperator, ValidationError, ROOT_PATH};
pub use validator::Validator;

#[cfg(test)]
mod tests;
