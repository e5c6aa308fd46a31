//! Loading schema and record files from disk.
//!
//! A schema file is TOML or JSON, chosen by extension:
//!
//! ```toml
//! entity = "users"
//!
//! [[fields]]
//! name = "age"
//! type = "number"
//!
//! [[fields]]
//! name = "role"
//! type = "enum"
//! enumValues = ["admin", "editor"]
//! ```
//!
//! A records file is a JSON array of objects.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sieve_core::Schema;
use thiserror::Error;

/// Errors that can occur while loading files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error during file read.
    #[error("failed to read '{path}': {source}")]
    ReadError {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The schema file extension is neither `.toml` nor `.json`.
    #[error("unsupported schema format '{path}' (expected a .toml or .json file)")]
    UnsupportedFormat {
        /// The offending path.
        path: PathBuf,
    },

    /// The file is not valid JSON, or does not describe a valid schema.
    #[error("invalid JSON in '{path}': {source}")]
    Json {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The file is not valid TOML, or does not describe a valid schema.
    #[error("invalid TOML in '{path}': {source}")]
    Toml {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The records file parsed but is not an array of objects.
    #[error("invalid records file '{path}': {message}")]
    InvalidRecords {
        /// The offending path.
        path: PathBuf,
        /// What was wrong.
        message: String,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Supported schema file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Toml,
    Json,
}

impl SchemaFormat {
    /// Picks the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(SchemaFormat::Toml),
            "json" => Some(SchemaFormat::Json),
            _ => None,
        }
    }
}

/// Loads a schema file.
///
/// # Errors
///
/// - Returns `StoreError::UnsupportedFormat` for an unknown extension.
/// - Returns `StoreError::ReadError` if the file cannot be read.
/// - Returns `StoreError::Toml` or `StoreError::Json` if the contents do not
///   describe a valid schema (including duplicate field names).
pub fn load_schema(path: &Path) -> Result<Schema> {
    let format = SchemaFormat::from_path(path).ok_or_else(|| StoreError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let contents = read(path)?;

    let schema = parse_schema(&contents, format).map_err(|e| e.at(path))?;
    log::debug!(
        "loaded schema with {} field(s) from {}",
        schema.len(),
        path.display()
    );
    Ok(schema)
}

/// Parses schema text in the given format.
///
/// # Errors
///
/// Returns the parse error; its path is empty until attached by the caller.
pub fn parse_schema(contents: &str, format: SchemaFormat) -> Result<Schema> {
    match format {
        SchemaFormat::Toml => toml::from_str(contents).map_err(|source| StoreError::Toml {
            path: PathBuf::new(),
            source,
        }),
        SchemaFormat::Json => serde_json::from_str(contents).map_err(|source| StoreError::Json {
            path: PathBuf::new(),
            source,
        }),
    }
}

/// Loads a records file.
///
/// # Errors
///
/// - Returns `StoreError::ReadError` if the file cannot be read.
/// - Returns `StoreError::Json` if the file is not valid JSON.
/// - Returns `StoreError::InvalidRecords` unless the file holds an array of objects.
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let contents = read(path)?;
    let records = parse_records(&contents).map_err(|e| e.at(path))?;
    log::debug!("loaded {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Parses records text: a JSON array of objects.
///
/// # Errors
///
/// Returns `StoreError::Json` or `StoreError::InvalidRecords`.
pub fn parse_records(contents: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(contents).map_err(|source| StoreError::Json {
        path: PathBuf::new(),
        source,
    })?;

    let Value::Array(records) = value else {
        return Err(StoreError::InvalidRecords {
            path: PathBuf::new(),
            message: "expected a JSON array of objects".to_string(),
        });
    };

    if let Some(index) = records.iter().position(|r| !r.is_object()) {
        return Err(StoreError::InvalidRecords {
            path: PathBuf::new(),
            message: format!("record {index} is not an object"),
        });
    }

    Ok(records)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| StoreError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

impl StoreError {
    /// Attaches the file path to a parse error.
    fn at(self, file: &Path) -> Self {
        let file = file.to_path_buf();
        match self {
            StoreError::Json { source, .. } => StoreError::Json { path: file, source },
            StoreError::Toml { source, .. } => StoreError::Toml { path: file, source },
            StoreError::InvalidRecords { message, .. } => {
                StoreError::InvalidRecords { path: file, message }
            }
            other => other,
        }
    }

    /// Returns true if the error is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::ReadError { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
