//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the sieve-core crate,
//! so a consumer can import the whole filter pipeline with a single use statement.
//!
//! # Example
//!
//! ```
//! use sieve_core::prelude::*;
//!
//! // Now you have access to:
//! // - FilterEngine (the facade)
//! // - Schema, FieldDescriptor, FieldType (schema description)
//! // - FilterNode, Condition, Group, Operator (filter trees)
//! // - ValidationError, EngineError, Result (errors)
//! // - MongoCompiler, SqlCompiler, QueryCompiler, QueryEvaluator (backends)
//! ```

// Engine
pub use crate::engine::FilterEngine;

// Error types
pub use crate::error::{EngineError, Result, SchemaError};

// Filter trees
pub use crate::filter::{decode, Condition, FilterNode, Group, Operator, ValidationError, Validator};

// Compilers and evaluation
pub use crate::query::{
    compile_to, CompiledQuery, MongoCompiler, MongoQuery, QueryCompiler, QueryEvaluator,
    QueryTarget, SqlCompiler, SqlQuery,
};

// Schema
pub use crate::schema::{FieldDescriptor, FieldType, Schema};
