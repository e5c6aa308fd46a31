//! Decoding raw JSON into a typed filter tree.
//!
//! Transport layers receive filters as untyped JSON. [`decode`] turns that
//! JSON into a [`FilterNode`] while reporting structural faults in the same
//! `{path, message}` form the validator uses, so a client sees every problem
//! at once instead of a single deserializer error.

use serde_json::{Map, Value};

use super::ast::{Condition, FilterNode, Group, Operator};
use super::error::{index_path, key_path, ValidationError, ROOT_PATH};
use super::validator::Validator;

/// Decodes a JSON filter.
///
/// `null` decodes to `None` (match everything). Every branch is visited, so
/// all structural faults are reported together.
///
/// # Errors
///
/// Returns the full list of structural faults if any node is malformed.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sieve_core::filter::decode;
///
/// let errors = decode(&json!({
///     "kind": "group",
///     "and": {"kind": "condition"},
///     "or": [{"kind": "condition", "field": "age", "operator": "like", "value": 1}]
/// }))
/// .unwrap_err();
///
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors[0].path, "<root>.and");
/// assert_eq!(errors[0].message, "\"and\" must be an array");
/// assert_eq!(errors[1].path, "<root>.or[0].operator");
/// assert_eq!(errors[1].message, "Unknown operator \"like\"");
/// ```
pub fn decode(value: &Value) -> Result<Option<FilterNode>, Vec<ValidationError>> {
    decode_checked(value, None)
}

/// Decodes a JSON filter, schema-checking every condition that decodes cleanly.
///
/// Malformed nodes are dropped and reported; their sound siblings are still
/// checked at their original paths, so errors come out in tree order.
pub(super) fn decode_checked(
    value: &Value,
    validator: Option<&Validator<'_>>,
) -> Result<Option<FilterNode>, Vec<ValidationError>> {
    if value.is_null() {
        return Ok(None);
    }

    let mut errors = Vec::new();
    let mut decoder = Decoder {
        validator,
        errors: &mut errors,
    };
    let node = decoder.node(value, ROOT_PATH);

    if errors.is_empty() {
        Ok(node)
    } else {
        Err(errors)
    }
}

/// Walks raw JSON, collecting faults as it goes.
struct Decoder<'v, 'e> {
    validator: Option<&'v Validator<'v>>,
    errors: &'e mut Vec<ValidationError>,
}

impl Decoder<'_, '_> {
    fn node(&mut self, value: &Value, path: &str) -> Option<FilterNode> {
        let Some(object) = value.as_object() else {
            self.errors
                .push(ValidationError::new(path, "Filter node must be an object"));
            return None;
        };

        match object.get("kind").and_then(Value::as_str) {
            Some("condition") => self.condition(object, path).map(FilterNode::Condition),
            Some("group") => self.group(object, path).map(FilterNode::Group),
            Some(other) => {
                self.errors.push(ValidationError::new(
                    key_path(path, "kind"),
                    format!("Unknown node kind \"{other}\" (expected \"condition\" or \"group\")"),
                ));
                None
            }
            None => {
                self.errors.push(ValidationError::new(
                    key_path(path, "kind"),
                    "Filter node requires a \"kind\" of \"condition\" or \"group\"",
                ));
                None
            }
        }
    }

    fn condition(&mut self, object: &Map<String, Value>, path: &str) -> Option<Condition> {
        let field = match object.get("field").and_then(Value::as_str) {
            Some(field) => Some(field),
            None => {
                self.errors.push(ValidationError::new(
                    key_path(path, "field"),
                    "\"field\" must be a string",
                ));
                None
            }
        };

        let operator = match object.get("operator").and_then(Value::as_str) {
            Some(name) => match name.parse::<Operator>() {
                Ok(operator) => Some(operator),
                Err(err) => {
                    self.errors.push(ValidationError::new(
                        key_path(path, "operator"),
                        err.to_string(),
                    ));
                    None
                }
            },
            None => {
                self.errors.push(ValidationError::new(
                    key_path(path, "operator"),
                    "\"operator\" must be a string",
                ));
                None
            }
        };

        let condition = Condition::new(field?, operator?, object.get("value").cloned());
        if let Some(validator) = self.validator {
            validator.validate_condition(&condition, path, self.errors);
        }
        Some(condition)
    }

    fn group(&mut self, object: &Map<String, Value>, path: &str) -> Option<Group> {
        let and = self.branch(object, "and", path);
        let or = self.branch(object, "or", path);
        Some(Group { and, or })
    }

    /// Decodes one of a group's child lists; a non-array reports only that branch.
    fn branch(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<Vec<FilterNode>> {
        let branch = key_path(path, key);

        match object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, item)| self.node(item, &index_path(&branch, i)))
                    .collect(),
            ),
            Some(_) => {
                self.errors.push(ValidationError::new(
                    branch,
                    format!("\"{key}\" must be an array"),
                ));
                None
            }
        }
    }
}
