//! Schema catalog module.
//!
//! The catalog is an external collaborator: it knows which tables exist,
//! which data source each belongs to, whether they are hidden, their
//! columns and the links declared between them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    SchemaCatalog                          │
//! │  - list_tables()       - find_tables()                    │
//! │  - get_table()         - get_columns()                    │
//! ├──────────────────────────────────────────────────────────┤
//! │                  ColumnValueSource                        │
//! │  - column_values()  (filter autocomplete)                 │
//! └──────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//!        InMemoryCatalog (tests, CLI JSON catalog file)
//! ```

mod memory;
mod provider;
mod types;

use std::path::PathBuf;

pub use memory::{ColumnValues, InMemoryCatalog};
pub use provider::{ColumnValueSource, SchemaCatalog};
pub use types::*;

/// Errors that can occur while reading the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
