//! File loading and a filtering repository for sieve.
//!
//! - [`store`] reads schema files (TOML or JSON) and record files (JSON),
//! - [`Repository`] runs validate → compile → evaluate over a loaded collection.

pub mod repository;
pub mod store;

pub use repository::{Repository, RepositoryError};
pub use store::{load_records, load_schema, SchemaFormat, StoreError};
