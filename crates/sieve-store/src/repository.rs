//! A fixed collection of records behind the filter pipeline.

use std::path::Path;

use serde_json::Value;
use sieve_core::query::{MongoCompiler, QueryCompiler, QueryEvaluator, SqlCompiler};
use sieve_core::{
    CompiledQuery, EngineError, FilterEngine, FilterNode, QueryTarget, Schema, SqlQuery,
    ValidationError,
};
use thiserror::Error;

use crate::store::{self, StoreError};

/// Errors returned by [`Repository`] operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The filter failed validation; every fault is included.
    #[error("filter is invalid ({} error(s))", .0.len())]
    Validation(Vec<ValidationError>),

    /// A compiler or the evaluator hit a precondition fault.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl RepositoryError {
    /// The validation faults, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            RepositoryError::Validation(errors) => Some(errors),
            RepositoryError::Engine(_) => None,
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Serves filtered reads over an in-memory collection.
///
/// Every operation validates the filter first and refuses to compile an
/// invalid one.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sieve_core::{FieldDescriptor, FieldType, FilterNode, Operator, Schema};
/// use sieve_store::Repository;
///
/// let schema = Schema::new(vec![FieldDescriptor::new("age", FieldType::Number)]).unwrap();
/// let repo = Repository::new(schema, vec![json!({"age": 20}), json!({"age": 40})]);
///
/// let adults = FilterNode::condition("age", Operator::Gte, json!(21));
/// assert_eq!(repo.count(Some(&adults)).unwrap(), 1);
///
/// let bad = FilterNode::condition("age", Operator::Gte, json!("old"));
/// let err = repo.find(Some(&bad)).unwrap_err();
/// assert_eq!(err.validation_errors().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Repository {
    engine: FilterEngine,
    records: Vec<Value>,
}

impl Repository {
    /// Creates a repository over `records`.
    pub fn new(schema: Schema, records: Vec<Value>) -> Self {
        Self {
            engine: FilterEngine::new(schema),
            records,
        }
    }

    /// Loads the schema and records files.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if either file cannot be loaded.
    pub fn open(schema_path: &Path, records_path: &Path) -> std::result::Result<Self, StoreError> {
        let schema = store::load_schema(schema_path)?;
        let records = store::load_records(records_path)?;
        Ok(Self::new(schema, records))
    }

    /// The engine filters run through.
    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    /// The schema filters are validated against.
    pub fn schema(&self) -> &Schema {
        self.engine.schema()
    }

    /// All records, in load order.
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// Number of records in the collection.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records matching `filter`, in load order.
    ///
    /// # Errors
    ///
    /// - Returns `RepositoryError::Validation` if the filter is invalid.
    /// - Returns `RepositoryError::Engine` if evaluation fails.
    pub fn find(&self, filter: Option<&FilterNode>) -> Result<Vec<&Value>> {
        self.check(filter)?;
        let query = MongoCompiler.compile(filter)?;
        let matched = QueryEvaluator::new(&query).filter_records(&self.records)?;
        log::debug!("find matched {} of {} record(s)", matched.len(), self.len());
        Ok(matched)
    }

    /// Decodes raw client JSON, then behaves like [`Repository::find`].
    ///
    /// # Errors
    ///
    /// Structural faults are reported as `RepositoryError::Validation` too.
    pub fn find_json(&self, filter: &Value) -> Result<Vec<&Value>> {
        let filter = self
            .engine
            .validate_json(filter)
            .map_err(RepositoryError::Validation)?;
        self.find(filter.as_ref())
    }

    /// Counts the records matching `filter`.
    ///
    /// # Errors
    ///
    /// Same as [`Repository::find`].
    pub fn count(&self, filter: Option<&FilterNode>) -> Result<usize> {
        self.find(filter).map(|records| records.len())
    }

    /// Compiles `filter` to a prepared-statement shape for an external database.
    ///
    /// # Errors
    ///
    /// - Returns `RepositoryError::Validation` if the filter is invalid.
    /// - Returns `RepositoryError::Engine` if compilation fails.
    pub fn prepare_sql(&self, filter: Option<&FilterNode>) -> Result<SqlQuery> {
        self.check(filter)?;
        Ok(SqlCompiler.compile(filter)?)
    }

    /// Validates `filter` and compiles it for `target`.
    ///
    /// # Errors
    ///
    /// Same as [`Repository::prepare_sql`].
    pub fn compile(&self, filter: Option<&FilterNode>, target: QueryTarget) -> Result<CompiledQuery> {
        self.check(filter)?;
        Ok(target.compile(filter)?)
    }

    fn check(&self, filter: Option<&FilterNode>) -> Result<()> {
        let errors = self.engine.validate(filter);
        if errors.is_empty() {
            Ok(())
        } else {
            log::debug!("rejecting filter with {} validation error(s)", errors.len());
            Err(RepositoryError::Validation(errors))
        }
    }
}
