//! Schema-driven validation of filter trees.

use serde_json::Value;

use super::ast::{Condition, FilterNode, Group, Operator};
use super::decode::decode_checked;
use super::error::{index_path, key_path, ValidationError, ROOT_PATH};
use crate::schema::{FieldDescriptor, FieldType, Schema};
use crate::value::{is_rfc4122_uuid, parse_date};

/// Validates filter trees against a [`Schema`].
///
/// Validation walks the whole tree and accumulates every fault; an empty
/// result means the filter may be compiled. The input is never modified.
///
/// # Checks per condition
///
/// 1. The field exists (otherwise the condition is not checked further).
/// 2. The field is filterable (otherwise the condition is not checked further).
/// 3. The operator is permitted for the field.
/// 4. The value has the shape the operator requires.
/// 5. Each value element matches the field's declared type.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sieve_core::filter::Validator;
/// use sieve_core::{FieldDescriptor, FieldType, FilterNode, Operator, Schema};
///
/// let schema = Schema::new(vec![FieldDescriptor::new("age", FieldType::Number)]).unwrap();
/// let validator = Validator::new(&schema);
///
/// let filter = FilterNode::condition("age", Operator::Eq, json!("x"));
/// let errors = validator.validate(Some(&filter));
///
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].path, "<root>.value");
/// assert_eq!(errors[0].message, "Field \"age\" must be a number");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    schema: &'a Schema,
}

impl<'a> Validator<'a> {
    /// Creates a validator for the given schema.
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Validates a filter, returning every fault found.
    ///
    /// An absent filter is valid and matches everything.
    pub fn validate(&self, filter: Option<&FilterNode>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if let Some(node) = filter {
            self.validate_node(node, ROOT_PATH, &mut errors);
        }
        errors
    }

    /// Decodes raw JSON and validates it in a single pass.
    ///
    /// Structural faults drop the offending node, but every sound condition
    /// is still checked against the schema, so one call reports both kinds of
    /// fault in tree order.
    ///
    /// # Errors
    ///
    /// Returns every structural and schema fault found.
    pub fn validate_json(
        &self,
        value: &Value,
    ) -> Result<Option<FilterNode>, Vec<ValidationError>> {
        decode_checked(value, Some(self))
    }

    /// Returns true if the filter has no faults.
    pub fn is_valid(&self, filter: Option<&FilterNode>) -> bool {
        self.validate(filter).is_empty()
    }

    fn validate_node(&self, node: &FilterNode, path: &str, errors: &mut Vec<ValidationError>) {
        match node {
            FilterNode::Condition(condition) => self.validate_condition(condition, path, errors),
            FilterNode::Group(group) => self.validate_group(group, path, errors),
        }
    }

    fn validate_group(&self, group: &Group, path: &str, errors: &mut Vec<ValidationError>) {
        for (key, children) in [("and", &group.and), ("or", &group.or)] {
            let Some(children) = children else {
                continue;
            };
            let branch = key_path(path, key);
            for (i, child) in children.iter().enumerate() {
                self.validate_node(child, &index_path(&branch, i), errors);
            }
        }
    }

    pub(super) fn validate_condition(
        &self,
        condition: &Condition,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let field = &condition.field;

        let Some(descriptor) = self.schema.field(field) else {
            errors.push(ValidationError::unknown_field(key_path(path, "field"), field));
            return;
        };

        if !descriptor.filterable {
            errors.push(ValidationError::new(
                key_path(path, "field"),
                format!("Field \"{field}\" is not filterable"),
            ));
            return;
        }

        if !descriptor.permits(condition.operator) {
            errors.push(ValidationError::new(
                key_path(path, "operator"),
                format!(
                    "Operator \"{}\" is not allowed for field \"{field}\"",
                    condition.operator
                ),
            ));
        }

        validate_value(descriptor, condition, &key_path(path, "value"), errors);
    }
}

/// Checks the value's shape against the operator, then each element's type.
fn validate_value(
    descriptor: &FieldDescriptor,
    condition: &Condition,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    let operator = condition.operator;
    let value = condition.value.as_ref();

    match operator {
        Operator::IsNull | Operator::IsNotNull => {
            if value.is_some() {
                errors.push(ValidationError::new(
                    path,
                    format!("Operator \"{operator}\" does not take a value"),
                ));
            }
        }
        Operator::Between => match value.and_then(Value::as_array) {
            Some(items) if items.len() == 2 => {
                for (i, item) in items.iter().enumerate() {
                    check_element(descriptor, item, &index_path(path, i), errors);
                }
            }
            _ => errors.push(ValidationError::new(
                path,
                "Operator \"between\" requires an array of exactly 2 values",
            )),
        },
        Operator::In => match value.and_then(Value::as_array) {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    check_element(descriptor, item, &index_path(path, i), errors);
                }
            }
            None => errors.push(ValidationError::new(
                path,
                "Operator \"in\" requires an array of values",
            )),
        },
        _ => match value {
            Some(item) => check_element(descriptor, item, path, errors),
            None => errors.push(ValidationError::new(
                path,
                format!("Field \"{}\" requires a value", descriptor.name),
            )),
        },
    }
}

fn check_element(
    descriptor: &FieldDescriptor,
    value: &Value,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    if let Err(message) = check_type(descriptor, value) {
        errors.push(ValidationError::new(path, message));
    }
}

/// Checks a single value against the field's declared type.
fn check_type(descriptor: &FieldDescriptor, value: &Value) -> Result<(), String> {
    let name = &descriptor.name;

    let ok = match descriptor.field_type {
        FieldType::String => value.is_string(),
        FieldType::Number => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Date => value.as_str().is_some_and(|s| parse_date(s).is_some()),
        FieldType::Uuid => value.as_str().is_some_and(is_rfc4122_uuid),
        FieldType::Enum => {
            let Some(s) = value.as_str() else {
                return Err(format!("Field \"{name}\" must be a string"));
            };
            match &descriptor.enum_values {
                Some(allowed) if !allowed.iter().any(|v| v == s) => {
                    return Err(format!(
                        "Field \"{name}\" must be one of: {}",
                        allowed.join(", ")
                    ));
                }
                _ => true,
            }
        }
    };

    if ok {
        Ok(())
    } else {
        Err(match descriptor.field_type {
            FieldType::String | FieldType::Enum => format!("Field \"{name}\" must be a string"),
            FieldType::Number => format!("Field \"{name}\" must be a number"),
            FieldType::Boolean => format!("Field \"{name}\" must be a boolean"),
            FieldType::Date => format!("Field \"{name}\" must be a valid date"),
            FieldType::Uuid => format!("Field \"{name}\" must be a valid UUID"),
        })
    }
}
