//! Schema-validated filter engine.
//!
//! A caller describes a filtering intent as a tree of [`FilterNode`]s
//! (conditions combined by `and`/`or` groups). The engine then:
//!
//! 1. validates the tree against a [`Schema`], collecting every fault as a
//!    path-tagged [`ValidationError`],
//! 2. compiles a valid tree into a Mongo-style query document or a
//!    parameterized SQL `WHERE` clause,
//! 3. evaluates Mongo-style queries against in-memory JSON records.
//!
//! # Quick Start
//!
//! ```
//! use serde_json::json;
//! use sieve_core::prelude::*;
//!
//! let schema = Schema::new(vec![
//!     FieldDescriptor::new("age", FieldType::Number),
//!     FieldDescriptor::new("isActive", FieldType::Boolean),
//! ])
//! .unwrap();
//! let engine = FilterEngine::new(schema);
//!
//! let filter = FilterNode::and(vec![
//!     FilterNode::condition("isActive", Operator::Eq, json!(true)),
//!     FilterNode::condition("age", Operator::Gt, json!(30)),
//! ]);
//! assert!(engine.validate(Some(&filter)).is_empty());
//!
//! let sql = engine.compile_to("sql", Some(&filter)).unwrap();
//! let sql = sql.as_sql().unwrap();
//! assert_eq!(sql.sql, "(isActive = ? AND age > ?)");
//! assert_eq!(sql.params, vec![json!(true), json!(30)]);
//!
//! let query = MongoCompiler.compile(Some(&filter)).unwrap();
//! let record = json!({"age": 41, "isActive": true});
//! assert!(engine.matches(&record, &query).unwrap());
//! ```

pub mod engine;
pub mod error;
pub mod filter;
pub mod prelude;
pub mod query;
pub mod schema;
mod value;

#[cfg(test)]
mod test_support;

pub use engine::FilterEngine;
pub use error::{EngineError, Result, SchemaError};
pub use filter::{Condition, FilterNode, Group, Operator, ValidationError};
pub use query::{CompiledQuery, MongoQuery, QueryCompiler, QueryTarget, SqlQuery};
pub use schema::{FieldDescriptor, FieldType, Schema};
