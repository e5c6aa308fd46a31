//! Tests for filter validation.

use serde_json::json;

use super::*;
use crate::schema::{FieldDescriptor, FieldType, Schema};
use crate::test_support::users_schema;

fn validate(filter: &FilterNode) -> Vec<ValidationError> {
    let schema = users_schema();
    Validator::new(&schema).validate(Some(filter))
}

fn messages(errors: &[ValidationError]) -> Vec<&str> {
    errors.iter().map(|e| e.message.as_str()).collect()
}

// ==================== Absent Filter ====================

#[test]
fn test_absent_filter_is_valid() {
    let schema = users_schema();
    let validator = Validator::new(&schema);

    assert!(validator.validate(None).is_empty());
    assert!(validator.is_valid(None));
}

#[test]
fn test_empty_group_is_valid() {
    let filter = FilterNode::Group(Group::default());
    assert!(validate(&filter).is_empty());
}

// ==================== Field Checks ====================

#[test]
fn test_unknown_field() {
    let errors = validate(&FilterNode::condition("password", Operator::Eq, json!("x")));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "<root>.field");
    assert_eq!(
        errors[0].message,
        "Field \"password\" is not allowed for filtering"
    );
    assert_eq!(errors[0].unknown_field.as_deref(), Some("password"));
}

#[test]
fn test_unknown_field_stops_further_checks() {
    // Operator and value are both wrong too, but only the field is reported.
    let errors = validate(&FilterNode::condition("password", Operator::Between, json!(1)));
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_not_filterable_field() {
    let errors = validate(&FilterNode::condition(
        "createdAt",
        Operator::Eq,
        json!("2023-01-01"),
    ));

    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("not filterable"));
    assert_eq!(errors[0].path, "<root>.field");
}

#[test]
fn test_not_filterable_stops_further_checks() {
    let errors = validate(&FilterNode::condition("createdAt", Operator::Contains, json!(5)));
    assert_eq!(messages(&errors), vec!["Field \"createdAt\" is not filterable"]);
}

// ==================== Operator Checks ====================

#[test]
fn test_operator_not_in_default_set() {
    let errors = validate(&FilterNode::condition("isActive", Operator::Gt, json!(true)));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "<root>.operator");
    assert_eq!(
        errors[0].message,
        "Operator \"gt\" is not allowed for field \"isActive\""
    );
}

#[test]
fn test_operator_error_does_not_stop_value_check() {
    let errors = validate(&FilterNode::condition("isActive", Operator::Gt, json!("yes")));

    assert_eq!(
        messages(&errors),
        vec![
            "Operator \"gt\" is not allowed for field \"isActive\"",
            "Field \"isActive\" must be a boolean",
        ]
    );
}

#[test]
fn test_date_does_not_allow_in_by_default() {
    let errors = validate(&FilterNode::condition(
        "lastLogin",
        Operator::In,
        json!(["2024-01-01"]),
    ));
    assert_eq!(
        messages(&errors),
        vec!["Operator \"in\" is not allowed for field \"lastLogin\""]
    );
}

#[test]
fn test_explicit_allowed_operators_override_defaults() {
    let schema = Schema::new(vec![
        FieldDescriptor::new("name", FieldType::String).with_operators([Operator::Eq])
    ])
    .unwrap();
    let validator = Validator::new(&schema);

    let contains = FilterNode::condition("name", Operator::Contains, json!("al"));
    let eq = FilterNode::condition("name", Operator::Eq, json!("Alice"));

    assert_eq!(validator.validate(Some(&contains)).len(), 1);
    assert!(validator.is_valid(Some(&eq)));
}

#[test]
fn test_every_default_operator_accepted_for_number() {
    for operator in FieldType::Number.default_operators() {
        let filter = match operator {
            Operator::IsNull | Operator::IsNotNull => FilterNode::unary("age", *operator),
            Operator::Between => FilterNode::condition("age", *operator, json!([1, 2])),
            Operator::In => FilterNode::condition("age", *operator, json!([1, 2, 3])),
            _ => FilterNode::condition("age", *operator, json!(1)),
        };
        assert!(validate(&filter).is_empty(), "operator {operator} rejected");
    }
}

// ==================== Value Shape Checks ====================

#[test]
fn test_null_operators_reject_value() {
    let errors = validate(&FilterNode::condition("email", Operator::IsNull, json!("x")));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "<root>.value");
    assert_eq!(errors[0].message, "Operator \"is_null\" does not take a value");
}

#[test]
fn test_null_operators_without_value() {
    assert!(validate(&FilterNode::unary("email", Operator::IsNull)).is_empty());
    assert!(validate(&FilterNode::unary("lastLogin", Operator::IsNotNull)).is_empty());
}

#[test]
fn test_between_valid() {
    let errors = validate(&FilterNode::condition("age", Operator::Between, json!([20, 30])));
    assert!(errors.is_empty());
}

#[test]
fn test_between_wrong_length_is_single_error() {
    let errors = validate(&FilterNode::condition(
        "age",
        Operator::Between,
        json!(["a", "b", "c"]),
    ));

    assert_eq!(
        messages(&errors),
        vec!["Operator \"between\" requires an array of exactly 2 values"]
    );
}

#[test]
fn test_between_not_an_array() {
    let errors = validate(&FilterNode::condition("age", Operator::Between, json!(20)));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "<root>.value");
}

#[test]
fn test_between_missing_value() {
    let errors = validate(&FilterNode::unary("age", Operator::Between));
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_between_elements_type_checked() {
    let errors = validate(&FilterNode::condition(
        "age",
        Operator::Between,
        json!([20, "thirty"]),
    ));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "<root>.value[1]");
    assert_eq!(errors[0].message, "Field \"age\" must be a number");
}

#[test]
fn test_in_accepts_empty_array() {
    assert!(validate(&FilterNode::condition("age", Operator::In, json!([]))).is_empty());
}

#[test]
fn test_in_requires_array() {
    let errors = validate(&FilterNode::condition("role", Operator::In, json!("admin")));
    assert_eq!(
        messages(&errors),
        vec!["Operator \"in\" requires an array of values"]
    );
}

#[test]
fn test_in_elements_type_checked() {
    let errors = validate(&FilterNode::condition(
        "role",
        Operator::In,
        json!(["admin", "owner", 3]),
    ));

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].path, "<root>.value[1]");
    assert_eq!(
        errors[0].message,
        "Field \"role\" must be one of: admin, editor, viewer"
    );
    assert_eq!(errors[1].path, "<root>.value[2]");
    assert_eq!(errors[1].message, "Field \"role\" must be a string");
}

#[test]
fn test_value_required() {
    let errors = validate(&FilterNode::unary("age", Operator::Gt));
    assert_eq!(messages(&errors), vec!["Field \"age\" requires a value"]);
}

#[test]
fn test_null_value_counts_as_absent() {
    let condition = Condition::new("age", Operator::Eq, Some(json!(null)));
    let errors = validate(&FilterNode::Condition(condition));
    assert_eq!(messages(&errors), vec!["Field \"age\" requires a value"]);
}

// ==================== Type Checks ====================

#[test]
fn test_number_type_mismatch() {
    let errors = validate(&FilterNode::condition("age", Operator::Eq, json!("x")));

    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("must be a number"));
}

#[test]
fn test_string_type_mismatch() {
    let errors = validate(&FilterNode::condition("name", Operator::Contains, json!(42)));
    assert_eq!(messages(&errors), vec!["Field \"name\" must be a string"]);
}

#[test]
fn test_boolean_type_mismatch() {
    let errors = validate(&FilterNode::condition("isActive", Operator::Eq, json!("true")));
    assert_eq!(messages(&errors), vec!["Field \"isActive\" must be a boolean"]);
}

#[test]
fn test_date_values() {
    let ok = ["2024-01-01", "2024-01-01T10:00:00Z", "2024-01-01T10:00:00"];
    for value in ok {
        let filter = FilterNode::condition("lastLogin", Operator::Gte, json!(value));
        assert!(validate(&filter).is_empty(), "{value} rejected");
    }

    let errors = validate(&FilterNode::condition(
        "lastLogin",
        Operator::Gte,
        json!("last tuesday"),
    ));
    assert_eq!(messages(&errors), vec!["Field \"lastLogin\" must be a valid date"]);

    let errors = validate(&FilterNode::condition("lastLogin", Operator::Gte, json!(1700000000)));
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_uuid_values() {
    let ok = FilterNode::condition(
        "id",
        Operator::Eq,
        json!("9B2F4C1E-8A3D-4F6B-9C2E-1D5A7B3C9E01"),
    );
    assert!(validate(&ok).is_empty());

    let errors = validate(&FilterNode::condition("id", Operator::Eq, json!("1234")));
    assert_eq!(messages(&errors), vec!["Field \"id\" must be a valid UUID"]);
}

#[test]
fn test_enum_without_declared_values_accepts_any_string() {
    let schema =
        Schema::new(vec![FieldDescriptor::new("status", FieldType::Enum)]).unwrap();
    let filter = FilterNode::condition("status", Operator::Eq, json!("anything"));

    assert!(Validator::new(&schema).is_valid(Some(&filter)));
}

// ==================== Tree Walking ====================

#[test]
fn test_valid_and_group() {
    let filter = FilterNode::and(vec![
        FilterNode::condition("isActive", Operator::Eq, json!(true)),
        FilterNode::condition("age", Operator::Gt, json!(30)),
    ]);
    assert!(validate(&filter).is_empty());
}

#[test]
fn test_errors_accumulate_with_paths() {
    let filter = FilterNode::and(vec![
        FilterNode::condition("age", Operator::Gt, json!(30)),
        FilterNode::condition("age", Operator::In, json!([1, "two"])),
        FilterNode::or(vec![
            FilterNode::condition("nickname", Operator::Eq, json!("al")),
            FilterNode::condition("role", Operator::Eq, json!("root")),
        ]),
    ]);

    let errors = validate(&filter);
    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();

    assert_eq!(
        paths,
        vec![
            "<root>.and[1].value[1]",
            "<root>.and[2].or[0].field",
            "<root>.and[2].or[1].value",
        ]
    );
}

#[test]
fn test_group_with_both_branches_validates_each() {
    let filter = FilterNode::Group(Group {
        and: Some(vec![FilterNode::condition("age", Operator::Eq, json!("x"))]),
        or: Some(vec![FilterNode::condition("name", Operator::Eq, json!(1))]),
    });

    let errors = validate(&filter);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].path, "<root>.and[0].value");
    assert_eq!(errors[1].path, "<root>.or[0].value");
}

#[test]
fn test_deep_nesting() {
    let mut node = FilterNode::condition("age", Operator::Eq, json!("deep"));
    for _ in 0..10 {
        node = FilterNode::and(vec![node]);
    }

    let errors = validate(&node);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, format!("<root>{}.value", ".and[0]".repeat(10)));
}

#[test]
fn test_validation_does_not_mutate_input() {
    let filter = FilterNode::and(vec![FilterNode::condition("age", Operator::Eq, json!("x"))]);
    let before = filter.clone();

    let _ = validate(&filter);

    assert_eq!(filter, before);
}

// ==================== Raw JSON ====================

fn validate_json(value: serde_json::Value) -> Vec<ValidationError> {
    let schema = users_schema();
    Validator::new(&schema).validate_json(&value).unwrap_err()
}

#[test]
fn test_json_bad_branch_does_not_skip_schema_checks() {
    let errors = validate_json(json!({
        "kind": "group",
        "and": "nope",
        "or": [{"kind": "condition", "field": "nosuch", "operator": "eq", "value": 1}]
    }));

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].path, "<root>.and");
    assert_eq!(errors[0].message, "\"and\" must be an array");
    assert_eq!(errors[1].path, "<root>.or[0].field");
    assert_eq!(
        errors[1].message,
        "Field \"nosuch\" is not allowed for filtering"
    );
}

#[test]
fn test_json_unknown_operator_keeps_sibling_value_check() {
    let errors = validate_json(json!({
        "kind": "group",
        "and": [
            {"kind": "condition", "field": "age", "operator": "like", "value": 1},
            {"kind": "condition", "field": "age", "operator": "eq", "value": "x"}
        ]
    }));

    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["<root>.and[0].operator", "<root>.and[1].value"]);
    assert_eq!(
        messages(&errors),
        vec!["Unknown operator \"like\"", "Field \"age\" must be a number"]
    );
}

#[test]
fn test_json_errors_follow_tree_order() {
    let errors = validate_json(json!({
        "kind": "group",
        "and": [
            {"kind": "condition", "field": "age", "operator": "eq", "value": "x"},
            {"kind": "leaf"}
        ],
        "or": [{"kind": "condition", "field": "isActive", "operator": "eq", "value": 1}]
    }));

    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["<root>.and[0].value", "<root>.and[1].kind", "<root>.or[0].value"]
    );
}

#[test]
fn test_json_sound_filter_decodes() {
    let schema = users_schema();
    let filter = Validator::new(&schema)
        .validate_json(&json!({"kind": "condition", "field": "age", "operator": "gt", "value": 30}))
        .unwrap();

    assert_eq!(filter, Some(FilterNode::condition("age", Operator::Gt, json!(30))));
}

#[test]
fn test_json_null_is_valid() {
    let schema = users_schema();
    assert_eq!(Validator::new(&schema).validate_json(&json!(null)), Ok(None));
}

// ==================== Operator Parsing ====================

#[test]
fn test_operator_round_trips_through_str() {
    for operator in Operator::ALL {
        assert_eq!(operator.as_str().parse::<Operator>(), Ok(operator));
    }
}

#[test]
fn test_operator_parse_unknown() {
    assert_eq!(
        "like".parse::<Operator>(),
        Err(UnknownOperator("like".to_string()))
    );
}

#[test]
fn test_operator_serde_names() {
    assert_eq!(
        serde_json::to_value(Operator::StartsWith).unwrap(),
        json!("starts_with")
    );
    assert_eq!(
        serde_json::from_value::<Operator>(json!("is_not_null")).unwrap(),
        Operator::IsNotNull
    );
}

#[test]
fn test_filter_node_serializes_with_kind_tag() {
    let node = FilterNode::and(vec![FilterNode::unary("email", Operator::IsNull)]);

    assert_eq!(
        serde_json::to_value(&node).unwrap(),
        json!({
            "kind": "group",
            "and": [{"kind": "condition", "field": "email", "operator": "is_null"}]
        })
    );
}
