//! In-memory evaluation of Mongo-style query documents.
//!
//! The evaluator runs a [`MongoQuery`] against JSON records. It accepts any
//! document the [`super::MongoCompiler`] can produce, plus hand-written ones
//! using the same operators:
//!
//! | Key | Meaning |
//! |---|---|
//! | `$and` | every sub-document matches |
//! | `$or` | at least one sub-document matches |
//! | `field: scalar` | strict equality (`null` also matches a missing field) |
//! | `$ne` `$gt` `$lt` `$gte` `$lte` | comparison with the field value |
//! | `$in` | equality with any listed value |
//! | `$regex` (+ `$options`) | regular expression match on a string field |
//!
//! Anything else is an [`EngineError`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sieve_core::query::{MongoQuery, QueryEvaluator};
//!
//! let query = MongoQuery::try_from(json!({
//!     "$or": [{"role": "admin"}, {"age": {"$gte": 40}}]
//! }))
//! .unwrap();
//!
//! let records = vec![
//!     json!({"name": "Alice", "role": "admin", "age": 34}),
//!     json!({"name": "Bob", "role": "editor", "age": 28}),
//!     json!({"name": "Carol", "role": "viewer", "age": 45}),
//! ];
//!
//! let evaluator = QueryEvaluator::new(&query);
//! let names: Vec<_> = evaluator
//!     .filter_records(&records)
//!     .unwrap()
//!     .into_iter()
//!     .map(|r| r["name"].as_str().unwrap())
//!     .collect();
//! assert_eq!(names, vec!["Alice", "Carol"]);
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};

use super::MongoQuery;
use crate::error::{EngineError, Result};
use crate::value::{compare, values_equal};

/// What a field missing from a record reads as.
static NULL: Value = Value::Null;

/// Evaluates a compiled query against records.
///
/// Every `$regex` in the query is compiled once, when the evaluator is
/// built, and reused for each record. A pattern that fails to compile is
/// only reported if evaluation actually reaches it. Neither the query nor
/// the records are modified.
#[derive(Debug, Clone)]
pub struct QueryEvaluator<'a> {
    query: &'a MongoQuery,
    regexes: RegexCache,
}

impl<'a> QueryEvaluator<'a> {
    /// Creates a new evaluator for `query`.
    pub fn new(query: &'a MongoQuery) -> Self {
        Self {
            query,
            regexes: RegexCache::for_document(query.as_map()),
        }
    }

    /// Returns true if the record satisfies the query.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the query uses an unknown operator,
    /// has the wrong shape, or carries an invalid regular expression.
    pub fn matches(&self, record: &Value) -> Result<bool> {
        self.matches_document(record, self.query.as_map())
    }

    /// Filters a slice of records, returning only those that match.
    ///
    /// # Errors
    ///
    /// Fails on the first record whose evaluation fails.
    pub fn filter_records<'b>(&self, records: &'b [Value]) -> Result<Vec<&'b Value>> {
        let mut matched = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let hit = self.matches(record)?;
            log::trace!("record {index}: {}", if hit { "match" } else { "no match" });
            if hit {
                matched.push(record);
            }
        }

        log::debug!("{} of {} records matched", matched.len(), records.len());
        Ok(matched)
    }

    /// Number of distinct patterns compiled up front.
    #[cfg(test)]
    pub(super) fn compiled_patterns(&self) -> usize {
        self.regexes.len()
    }

    fn matches_document(&self, record: &Value, document: &Map<String, Value>) -> Result<bool> {
        for (key, expected) in document {
            let hit = match key.as_str() {
                "$and" => self.all(record, sub_documents("$and", expected)?)?,
                "$or" => self.any(record, sub_documents("$or", expected)?)?,
                op if op.starts_with('$') => return Err(EngineError::unsupported_operator(op)),
                field => self.matches_field(field_value(record, field), expected)?,
            };

            if !hit {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn all(&self, record: &Value, documents: &[Value]) -> Result<bool> {
        for document in documents {
            if !self.matches_document(record, as_document(document)?)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn any(&self, record: &Value, documents: &[Value]) -> Result<bool> {
        for document in documents {
            if self.matches_document(record, as_document(document)?)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn matches_field(&self, actual: &Value, expected: &Value) -> Result<bool> {
        match expected {
            Value::Object(ops) if is_operator_document(ops) => self.matches_operators(actual, ops),
            _ => Ok(values_equal(actual, expected)),
        }
    }

    fn matches_operators(&self, actual: &Value, ops: &Map<String, Value>) -> Result<bool> {
        let options = ops.get("$options");
        if options.is_some() && !ops.contains_key("$regex") {
            return Err(EngineError::malformed("$options requires $regex"));
        }

        for (op, operand) in ops {
            let hit = match op.as_str() {
                "$ne" => !values_equal(actual, operand),
                "$gt" => ordered(actual, operand, |o| o == Ordering::Greater),
                "$gte" => ordered(actual, operand, |o| o != Ordering::Less),
                "$lt" => ordered(actual, operand, |o| o == Ordering::Less),
                "$lte" => ordered(actual, operand, |o| o != Ordering::Greater),
                "$in" => operand
                    .as_array()
                    .ok_or_else(|| EngineError::malformed("$in must be an array"))?
                    .iter()
                    .any(|candidate| values_equal(actual, candidate)),
                "$regex" => self.regex_matches(actual, operand, options)?,
                "$options" => true,
                other => return Err(EngineError::unsupported_operator(other)),
            };

            if !hit {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn regex_matches(
        &self,
        actual: &Value,
        pattern: &Value,
        options: Option<&Value>,
    ) -> Result<bool> {
        let pattern = pattern
            .as_str()
            .ok_or_else(|| EngineError::malformed("$regex must be a string"))?;
        let flags = regex_flags(options)?;

        let hit = match self.regexes.get(pattern, flags) {
            Some(Ok(regex)) => actual.as_str().is_some_and(|text| regex.is_match(text)),
            Some(Err(err)) => return Err(err.clone()),
            None => {
                let regex = build_regex(pattern, flags)?;
                actual.as_str().is_some_and(|text| regex.is_match(text))
            }
        };
        Ok(hit)
    }
}

/// Returns true if `record` satisfies `query`.
///
/// Shorthand for `QueryEvaluator::new(query).matches(record)`.
pub fn matches(record: &Value, query: &MongoQuery) -> Result<bool> {
    QueryEvaluator::new(query).matches(record)
}

/// Compiled `$regex` operands keyed by pattern, then by flags.
#[derive(Debug, Clone, Default)]
struct RegexCache {
    compiled: HashMap<String, HashMap<String, Result<Regex>>>,
}

impl RegexCache {
    fn for_document(document: &Map<String, Value>) -> Self {
        let mut cache = Self::default();
        cache.collect(document);
        cache
    }

    fn collect(&mut self, document: &Map<String, Value>) {
        for (key, value) in document {
            match (key.as_str(), value) {
                ("$and" | "$or", Value::Array(documents)) => documents
                    .iter()
                    .filter_map(Value::as_object)
                    .for_each(|sub| self.collect(sub)),
                (_, Value::Object(ops)) => self.insert(ops),
                _ => {}
            }
        }
    }

    fn insert(&mut self, ops: &Map<String, Value>) {
        let Some(pattern) = ops.get("$regex").and_then(Value::as_str) else {
            return;
        };
        let Ok(flags) = regex_flags(ops.get("$options")) else {
            return;
        };

        self.compiled
            .entry(pattern.to_string())
            .or_default()
            .entry(flags.to_string())
            .or_insert_with(|| build_regex(pattern, flags));
    }

    fn get(&self, pattern: &str, flags: &str) -> Option<&Result<Regex>> {
        self.compiled.get(pattern)?.get(flags)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.compiled.values().map(HashMap::len).sum()
    }
}

fn sub_documents<'v>(key: &str, value: &'v Value) -> Result<&'v [Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| EngineError::malformed(format!("{key} must be an array")))
}

fn as_document(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| EngineError::malformed(format!("expected a query document, got {value}")))
}

fn field_value<'v>(record: &'v Value, field: &str) -> &'v Value {
    record.get(field).unwrap_or(&NULL)
}

fn is_operator_document(document: &Map<String, Value>) -> bool {
    document.keys().any(|key| key.starts_with('$'))
}

fn ordered(actual: &Value, operand: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    compare(actual, operand).is_some_and(accept)
}

fn regex_flags(options: Option<&Value>) -> Result<&str> {
    match options {
        None => Ok(""),
        Some(value) => value
            .as_str()
            .ok_or_else(|| EngineError::malformed("$options must be a string")),
    }
}

fn build_regex(pattern: &str, flags: &str) -> Result<Regex> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            other => {
                return Err(EngineError::malformed(format!(
                    "unsupported $options flag '{other}'"
                )))
            }
        };
    }

    builder.build().map_err(|e| EngineError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
