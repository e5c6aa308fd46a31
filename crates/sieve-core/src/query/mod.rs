//! Compilation of validated filter trees into backend query representations.
//!
//! Two compilers are provided:
//!
//! - [`MongoCompiler`] produces a Mongo-style query document ([`MongoQuery`]),
//!   which [`QueryEvaluator`] can run against in-memory JSON records,
//! - [`SqlCompiler`] produces a parameterized `WHERE` clause ([`SqlQuery`]).
//!
//! Compilers assume the filter already passed validation. Input that breaks
//! that assumption is reported as an [`EngineError`], never as a validation
//! fault.
//!
//! The set of targets is closed; [`QueryTarget`] names them and parsing an
//! unregistered name fails with [`EngineError::UnknownTarget`].

mod evaluator;
mod mongo;
mod sql;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::filter::{Condition, FilterNode};
use crate::value::scalar_text;

pub use evaluator::{matches, QueryEvaluator};
pub use mongo::{MongoCompiler, MongoQuery};
pub use sql::{SqlCompiler, SqlQuery};

/// A stateless translator from a filter tree to a target representation.
pub trait QueryCompiler {
    /// The compiled representation.
    type Output;

    /// Compiles a filter; `None` compiles to the target's "match everything".
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the filter violates the compiler's
    /// preconditions (it was never validated).
    fn compile(&self, filter: Option<&FilterNode>) -> Result<Self::Output>;
}

/// The registered compile targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryTarget {
    Mongo,
    Sql,
}

impl QueryTarget {
    /// Every registered target.
    pub const ALL: [QueryTarget; 2] = [QueryTarget::Mongo, QueryTarget::Sql];

    /// The registry name of the target.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryTarget::Mongo => "mongo",
            QueryTarget::Sql => "sql",
        }
    }

    /// Compiles a filter with this target's compiler.
    pub fn compile(&self, filter: Option<&FilterNode>) -> Result<CompiledQuery> {
        match self {
            QueryTarget::Mongo => MongoCompiler.compile(filter).map(CompiledQuery::Mongo),
            QueryTarget::Sql => SqlCompiler.compile(filter).map(CompiledQuery::Sql),
        }
    }
}

impl fmt::Display for QueryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryTarget {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        QueryTarget::ALL
            .into_iter()
            .find(|target| target.as_str() == s)
            .ok_or_else(|| EngineError::unknown_target(s))
    }
}

/// Output of [`compile_to`]: one of the targets' representations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompiledQuery {
    Mongo(MongoQuery),
    Sql(SqlQuery),
}

impl CompiledQuery {
    /// The target that produced this query.
    pub fn target(&self) -> QueryTarget {
        match self {
            CompiledQuery::Mongo(_) => QueryTarget::Mongo,
            CompiledQuery::Sql(_) => QueryTarget::Sql,
        }
    }

    /// Returns the Mongo-style document, if this is one.
    pub fn as_mongo(&self) -> Option<&MongoQuery> {
        match self {
            CompiledQuery::Mongo(query) => Some(query),
            CompiledQuery::Sql(_) => None,
        }
    }

    /// Returns the SQL clause, if this is one.
    pub fn as_sql(&self) -> Option<&SqlQuery> {
        match self {
            CompiledQuery::Sql(query) => Some(query),
            CompiledQuery::Mongo(_) => None,
        }
    }
}

/// Compiles a filter with the compiler registered under `name`.
///
/// # Errors
///
/// Returns `EngineError::UnknownTarget` for a name other than `mongo` or
/// `sql`, and any precondition fault raised by the compiler.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sieve_core::query::compile_to;
/// use sieve_core::{EngineError, FilterNode, Operator};
///
/// let filter = FilterNode::condition("age", Operator::Between, json!([20, 30]));
///
/// let sql = compile_to("sql", Some(&filter)).unwrap();
/// assert_eq!(sql.as_sql().unwrap().sql, "age BETWEEN ? AND ?");
///
/// assert!(matches!(
///     compile_to("cassandra", Some(&filter)),
///     Err(EngineError::UnknownTarget { .. })
/// ));
/// ```
pub fn compile_to(name: &str, filter: Option<&FilterNode>) -> Result<CompiledQuery> {
    let target: QueryTarget = name.parse()?;
    log::debug!("compiling filter for target {target}");
    target.compile(filter)
}

// ==================== Precondition Helpers ====================

/// The single value of a condition.
fn single_value(condition: &Condition) -> Result<&Value> {
    condition
        .value
        .as_ref()
        .ok_or_else(|| precondition(condition, "expected a value"))
}

/// The value list of an `in` condition.
fn value_list(condition: &Condition) -> Result<&[Value]> {
    condition
        .value
        .as_ref()
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| precondition(condition, "expected an array of values"))
}

/// The bounds of a `between` condition.
fn value_range(condition: &Condition) -> Result<(&Value, &Value)> {
    match value_list(condition)? {
        [low, high] => Ok((low, high)),
        _ => Err(precondition(condition, "expected an array of exactly 2 values")),
    }
}

/// The text operand of a pattern operator.
fn value_text(condition: &Condition) -> Result<String> {
    scalar_text(single_value(condition)?)
        .ok_or_else(|| precondition(condition, "expected a scalar value"))
}

fn precondition(condition: &Condition, message: &str) -> EngineError {
    EngineError::invalid_value(&condition.field, condition.operator.as_str(), message)
}
