//! Parameterized SQL `WHERE` clause compiler.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{single_value, value_list, value_range, value_text, QueryCompiler};
use crate::error::Result;
use crate::filter::{Condition, FilterNode, Group, Operator};

/// Clause that matches every row.
const MATCH_ALL: &str = "1=1";

/// Clause that matches no row.
const MATCH_NONE: &str = "1=0";

/// A compiled `WHERE` clause with positional `?` placeholders.
///
/// `params[i]` binds the `i`-th placeholder, counting left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlQuery {
    /// The match-everything clause.
    pub fn match_all() -> Self {
        Self {
            sql: MATCH_ALL.to_string(),
            params: Vec::new(),
        }
    }

    /// Number of `?` placeholders in the clause.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// Compiles filter trees into [`SqlQuery`] clauses.
///
/// Field names are emitted as given; they come from a validated schema.
/// Values are never interpolated, only bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlCompiler;

impl QueryCompiler for SqlCompiler {
    type Output = SqlQuery;

    fn compile(&self, filter: Option<&FilterNode>) -> Result<SqlQuery> {
        let Some(node) = filter else {
            return Ok(SqlQuery::match_all());
        };

        let mut params = Vec::new();
        let sql = compile_node(node, &mut params)?;
        Ok(SqlQuery { sql, params })
    }
}

fn compile_node(node: &FilterNode, params: &mut Vec<Value>) -> Result<String> {
    match node {
        FilterNode::Condition(condition) => compile_condition(condition, params),
        FilterNode::Group(group) => compile_group(group, params),
    }
}

fn compile_group(group: &Group, params: &mut Vec<Value>) -> Result<String> {
    let and = group
        .and
        .as_deref()
        .map(|children| join(children, " AND ", MATCH_ALL, params))
        .transpose()?;
    let or = group
        .or
        .as_deref()
        .map(|children| join(children, " OR ", MATCH_NONE, params))
        .transpose()?;

    Ok(match (and, or) {
        (Some(and), Some(or)) => format!("({and} AND {or})"),
        (Some(part), None) | (None, Some(part)) => part,
        (None, None) => MATCH_ALL.to_string(),
    })
}

/// Joins compiled children in order; an empty list yields `empty`.
fn join(
    children: &[FilterNode],
    separator: &str,
    empty: &str,
    params: &mut Vec<Value>,
) -> Result<String> {
    if children.is_empty() {
        return Ok(empty.to_string());
    }

    let parts = children
        .iter()
        .map(|child| compile_node(child, params))
        .collect::<Result<Vec<_>>>()?;

    Ok(format!("({})", parts.join(separator)))
}

fn compile_condition(condition: &Condition, params: &mut Vec<Value>) -> Result<String> {
    let field = &condition.field;

    let sql = match condition.operator {
        Operator::Eq => bind(field, "=", single_value(condition)?, params),
        Operator::Neq => bind(field, "<>", single_value(condition)?, params),
        Operator::Gt => bind(field, ">", single_value(condition)?, params),
        Operator::Lt => bind(field, "<", single_value(condition)?, params),
        Operator::Gte => bind(field, ">=", single_value(condition)?, params),
        Operator::Lte => bind(field, "<=", single_value(condition)?, params),
        Operator::In => {
            let values = value_list(condition)?;
            if values.is_empty() {
                MATCH_NONE.to_string()
            } else {
                params.extend(values.iter().cloned());
                let placeholders = vec!["?"; values.len()].join(", ");
                format!("{field} IN ({placeholders})")
            }
        }
        Operator::Between => {
            let (low, high) = value_range(condition)?;
            params.push(low.clone());
            params.push(high.clone());
            format!("{field} BETWEEN ? AND ?")
        }
        Operator::Contains => like(field, format!("%{}%", value_text(condition)?), params),
        Operator::StartsWith => like(field, format!("{}%", value_text(condition)?), params),
        Operator::EndsWith => like(field, format!("%{}", value_text(condition)?), params),
        Operator::IsNull => format!("{field} IS NULL"),
        Operator::IsNotNull => format!("{field} IS NOT NULL"),
    };

    Ok(sql)
}

fn bind(field: &str, op: &str, value: &Value, params: &mut Vec<Value>) -> String {
    params.push(value.clone());
    format!("{field} {op} ?")
}

fn like(field: &str, pattern: String, params: &mut Vec<Value>) -> String {
    params.push(Value::String(pattern));
    format!("{field} LIKE ?")
}
