//! The engine facade: one schema, the validator, the compilers and the evaluator.

use serde_json::Value;

use crate::error::Result;
use crate::filter::{FilterNode, ValidationError, Validator};
use crate::query::{self, CompiledQuery, MongoQuery, QueryCompiler, QueryEvaluator};
use crate::schema::Schema;

/// Entry point bundling a [`Schema`] with the filter pipeline.
///
/// The engine is an immutable value; it can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    schema: Schema,
}

impl FilterEngine {
    /// Creates an engine for the given schema.
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// The schema filters are validated against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates a filter, returning every fault found.
    ///
    /// An absent filter is valid.
    pub fn validate(&self, filter: Option<&FilterNode>) -> Vec<ValidationError> {
        let errors = Validator::new(&self.schema).validate(filter);
        log::debug!("validation finished with {} error(s)", errors.len());
        errors
    }

    /// Decodes raw client JSON and validates it against the schema.
    ///
    /// Structural faults (wrong node shapes, unknown operators) drop only the
    /// offending node; every sound condition is still schema-checked, and all
    /// faults come back in tree order.
    ///
    /// # Errors
    ///
    /// Returns every structural or schema fault found.
    pub fn validate_json(
        &self,
        value: &Value,
    ) -> std::result::Result<Option<FilterNode>, Vec<ValidationError>> {
        let result = Validator::new(&self.schema).validate_json(value);
        if let Err(errors) = &result {
            log::debug!("validation finished with {} error(s)", errors.len());
        }
        result
    }

    /// Compiles a filter with an explicit compiler.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::EngineError`] if the filter violates the
    /// compiler's preconditions.
    pub fn compile<C: QueryCompiler>(
        &self,
        compiler: &C,
        filter: Option<&FilterNode>,
    ) -> Result<C::Output> {
        compiler.compile(filter)
    }

    /// Compiles a filter with the compiler registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownTarget` for an unregistered name.
    pub fn compile_to(&self, name: &str, filter: Option<&FilterNode>) -> Result<CompiledQuery> {
        query::compile_to(name, filter)
    }

    /// Returns true if the record satisfies a compiled Mongo-style query.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::EngineError`] for unknown or malformed operators.
    pub fn matches(&self, record: &Value, query: &MongoQuery) -> Result<bool> {
        query::matches(record, query)
    }

    /// Returns the records satisfying a compiled Mongo-style query.
    ///
    /// # Errors
    ///
    /// Fails on the first record whose evaluation fails.
    pub fn filter_records<'b>(
        &self,
        records: &'b [Value],
        query: &MongoQuery,
    ) -> Result<Vec<&'b Value>> {
        QueryEvaluator::new(query).filter_records(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::filter::Operator;
    use crate::query::MongoCompiler;
    use crate::test_support::{users, users_schema};
    use serde_json::json;

    fn engine() -> FilterEngine {
        FilterEngine::new(users_schema())
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FilterEngine>();
    }

    #[test]
    fn test_validate_absent_filter() {
        assert!(engine().validate(None).is_empty());
    }

    #[test]
    fn test_validate_json_accepts_valid_input() {
        let filter = engine()
            .validate_json(&json!({
                "kind": "condition",
                "field": "age",
                "operator": "gte",
                "value": 18
            }))
            .unwrap();

        assert_eq!(
            filter,
            Some(FilterNode::condition("age", Operator::Gte, json!(18)))
        );
    }

    #[test]
    fn test_validate_json_null_is_absent() {
        assert_eq!(engine().validate_json(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_validate_json_reports_structural_faults() {
        let errors = engine()
            .validate_json(&json!({"kind": "group", "and": "nope"}))
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "\"and\" must be an array");
    }

    #[test]
    fn test_validate_json_reports_schema_faults() {
        let errors = engine()
            .validate_json(&json!({
                "kind": "condition",
                "field": "age",
                "operator": "eq",
                "value": "x"
            }))
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("must be a number"));
    }

    #[test]
    fn test_validate_json_mixes_structural_and_schema_faults() {
        let errors = engine()
            .validate_json(&json!({
                "kind": "group",
                "and": [
                    {"kind": "condition", "field": "age", "operator": "like", "value": 1},
                    {"kind": "condition", "field": "age", "operator": "eq", "value": "x"}
                ]
            }))
            .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].path, "<root>.and[0].operator");
        assert_eq!(errors[1].path, "<root>.and[1].value");
        assert_eq!(errors[1].message, "Field \"age\" must be a number");
    }

    #[test]
    fn test_compile_with_explicit_compiler() {
        let filter = FilterNode::condition("role", Operator::Eq, json!("admin"));
        let query = engine().compile(&MongoCompiler, Some(&filter)).unwrap();
        assert_eq!(query.into_value(), json!({"role": "admin"}));
    }

    #[test]
    fn test_compile_to_unknown_target() {
        assert_eq!(
            engine().compile_to("redis", None).unwrap_err(),
            EngineError::unknown_target("redis")
        );
    }

    #[test]
    fn test_filter_records() {
        let engine = engine();
        let filter = FilterNode::condition("isActive", Operator::Eq, json!(false));
        let query = engine.compile(&MongoCompiler, Some(&filter)).unwrap();

        let records = users();
        let matched = engine.filter_records(&records, &query).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0]["name"], "Carol Clark");
        assert!(engine.matches(&records[2], &query).unwrap());
    }
}
