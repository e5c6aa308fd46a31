//! Output formatting utilities for the sv CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by what is being shown:
//!
//! - [`validation`] - Validation results and diagnostics
//! - [`queries`] - Compiled Mongo-style documents and SQL clauses
//! - [`records`] - Matching records and counts
//! - [`schema`] - Schema field listings
//! - [`helpers`] - Common formatting utilities (truncation, cells, JSON)

pub mod helpers;
mod queries;
mod records;
mod schema;
mod validation;

// Validation
pub use validation::{format_diagnostics, format_valid_json, format_valid_table};

// Queries
pub use queries::{format_compiled_json, format_compiled_table};

// Records
pub use records::{format_count_json, format_records_json, format_records_table, record_columns};

// Schema
pub use schema::{format_schema_json, format_schema_table};
