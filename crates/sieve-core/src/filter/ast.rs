//! Filter tree data model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::UnknownOperator;

/// Comparison operator used by a [`Condition`].
///
/// The value shape each operator expects is fixed:
///
/// - `is_null`, `is_not_null` take no value,
/// - `between` takes an array of exactly two values,
/// - `in` takes an array of any length,
/// - every other operator takes a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    Between,
    Contains,
    StartsWith,
    EndsWith,
    IsNull,
    IsNotNull,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 13] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
        Operator::In,
        Operator::Between,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    /// Returns the wire name of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Between => "between",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
        }
    }

    /// Returns false for the operators that must not carry a value.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Operator::IsNull | Operator::IsNotNull)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// Leaf node: tests one field with one operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Name of the field being tested.
    pub field: String,

    /// The comparison to apply.
    pub operator: Operator,

    /// Operand; its required shape depends on `operator`. `null` reads as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Condition {
    /// Creates a condition.
    pub fn new(field: impl Into<String>, operator: Operator, value: Option<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.filter(|v| !v.is_null()),
        }
    }
}

/// Internal node: combines children with AND and/or OR.
///
/// When both lists are set the two parts are themselves ANDed. A group with
/// neither list matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Children that must all match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Vec<FilterNode>>,

    /// Children of which at least one must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Vec<FilterNode>>,
}

impl Group {
    /// Returns true if the group sets neither `and` nor `or`.
    pub fn is_empty(&self) -> bool {
        self.and.is_none() && self.or.is_none()
    }
}

/// A node of the filter tree.
///
/// Nodes are discriminated by an explicit `kind` tag:
///
/// ```
/// use serde_json::json;
/// use sieve_core::{FilterNode, Operator};
///
/// let node: FilterNode = serde_json::from_value(json!({
///     "kind": "group",
///     "or": [
///         {"kind": "condition", "field": "role", "operator": "eq", "value": "admin"},
///         {"kind": "condition", "field": "isActive", "operator": "eq", "value": true}
///     ]
/// }))
/// .unwrap();
///
/// assert_eq!(
///     node,
///     FilterNode::or(vec![
///         FilterNode::condition("role", Operator::Eq, json!("admin")),
///         FilterNode::condition("isActive", Operator::Eq, json!(true)),
///     ])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterNode {
    Condition(Condition),
    Group(Group),
}

impl FilterNode {
    /// Creates a condition node with a value.
    pub fn condition(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        FilterNode::Condition(Condition::new(field, operator, Some(value)))
    }

    /// Creates a condition node without a value (`is_null` / `is_not_null`).
    pub fn unary(field: impl Into<String>, operator: Operator) -> Self {
        FilterNode::Condition(Condition::new(field, operator, None))
    }

    /// Creates a group whose children must all match.
    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterNode::Group(Group {
            and: Some(children),
            or: None,
        })
    }

    /// Creates a group of which at least one child must match.
    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterNode::Group(Group {
            and: None,
            or: Some(children),
        })
    }

    /// Returns true for leaf nodes.
    pub fn is_condition(&self) -> bool {
        matches!(self, FilterNode::Condition(_))
    }

    /// Number of conditions in the subtree.
    pub fn condition_count(&self) -> usize {
        match self {
            FilterNode::Condition(_) => 1,
            FilterNode::Group(group) => group
                .and
                .iter()
                .chain(group.or.iter())
                .flatten()
                .map(FilterNode::condition_count)
                .sum(),
        }
    }
}

impl From<Condition> for FilterNode {
    fn from(condition: Condition) -> Self {
        FilterNode::Condition(condition)
    }
}

impl From<Group> for FilterNode {
    fn from(group: Group) -> Self {
        FilterNode::Group(group)
    }
}
