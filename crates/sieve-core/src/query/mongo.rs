//! Mongo-style query document compiler.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{single_value, value_list, value_range, value_text, QueryCompiler};
use crate::error::{EngineError, Result};
use crate::filter::{Condition, FilterNode, Group, Operator};

/// A compiled Mongo-style query document.
///
/// Keys are field names or the boolean combinators `$and` / `$or`. A field
/// maps either to a scalar (equality) or to an operator document such as
/// `{"$gte": 20, "$lte": 30}`. The empty document matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MongoQuery(Map<String, Value>);

impl MongoQuery {
    /// Creates the empty (match everything) query.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying document.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns true for the match-everything query.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the query into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for MongoQuery {
    type Error = EngineError;

    /// Wraps a JSON document; anything but an object is malformed.
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(MongoQuery(map)),
            other => Err(EngineError::malformed(format!(
                "query must be an object, got {other}"
            ))),
        }
    }
}

/// Compiles filter trees into [`MongoQuery`] documents.
///
/// | Operator | Document |
/// |---|---|
/// | `eq` | `{f: v}` |
/// | `neq` | `{f: {"$ne": v}}` |
/// | `gt` `lt` `gte` `lte` | `{f: {"$gt": v}}` … |
/// | `in` | `{f: {"$in": [..]}}` |
/// | `between` | `{f: {"$gte": lo, "$lte": hi}}` |
/// | `contains` `starts_with` `ends_with` | `{f: {"$regex": .., "$options": "i"}}` |
/// | `is_null` | `{f: null}` |
/// | `is_not_null` | `{f: {"$ne": null}}` |
///
/// Groups become `{"$and": [..]}` and/or `{"$or": [..]}`.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sieve_core::query::MongoCompiler;
/// use sieve_core::{FilterNode, Operator, QueryCompiler};
///
/// let filter = FilterNode::and(vec![
///     FilterNode::condition("age", Operator::Gt, json!(30)),
///     FilterNode::condition("name", Operator::StartsWith, json!("Al")),
/// ]);
///
/// let query = MongoCompiler.compile(Some(&filter)).unwrap();
/// assert_eq!(
///     query.into_value(),
///     json!({"$and": [
///         {"age": {"$gt": 30}},
///         {"name": {"$regex": "^Al", "$options": "i"}}
///     ]})
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoCompiler;

impl QueryCompiler for MongoCompiler {
    type Output = MongoQuery;

    fn compile(&self, filter: Option<&FilterNode>) -> Result<MongoQuery> {
        match filter {
            None => Ok(MongoQuery::new()),
            Some(node) => compile_node(node).map(MongoQuery),
        }
    }
}

fn compile_node(node: &FilterNode) -> Result<Map<String, Value>> {
    match node {
        FilterNode::Condition(condition) => compile_condition(condition),
        FilterNode::Group(group) => compile_group(group),
    }
}

fn compile_group(group: &Group) -> Result<Map<String, Value>> {
    let mut query = Map::new();

    if let Some(children) = &group.and {
        query.insert("$and".to_string(), compile_children(children)?);
    }
    if let Some(children) = &group.or {
        query.insert("$or".to_string(), compile_children(children)?);
    }

    Ok(query)
}

fn compile_children(children: &[FilterNode]) -> Result<Value> {
    children
        .iter()
        .map(|child| compile_node(child).map(Value::Object))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn compile_condition(condition: &Condition) -> Result<Map<String, Value>> {
    let predicate = match condition.operator {
        Operator::Eq => single_value(condition)?.clone(),
        Operator::Neq => json!({ "$ne": single_value(condition)? }),
        Operator::Gt => json!({ "$gt": single_value(condition)? }),
        Operator::Lt => json!({ "$lt": single_value(condition)? }),
        Operator::Gte => json!({ "$gte": single_value(condition)? }),
        Operator::Lte => json!({ "$lte": single_value(condition)? }),
        Operator::In => json!({ "$in": value_list(condition)? }),
        Operator::Between => {
            let (low, high) = value_range(condition)?;
            json!({ "$gte": low, "$lte": high })
        }
        Operator::Contains => regex(regex::escape(&value_text(condition)?)),
        Operator::StartsWith => regex(format!("^{}", regex::escape(&value_text(condition)?))),
        Operator::EndsWith => regex(format!("{}$", regex::escape(&value_text(condition)?))),
        Operator::IsNull => Value::Null,
        Operator::IsNotNull => json!({ "$ne": null }),
    };

    let mut query = Map::new();
    query.insert(condition.field.clone(), predicate);
    Ok(query)
}

/// Case-insensitive regex operator document.
fn regex(pattern: String) -> Value {
    json!({ "$regex": pattern, "$options": "i" })
}
