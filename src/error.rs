//! Crate-wide error type.
//!
//! Every failure raised while editing, validating or shaping a query
//! specification surfaces as a [`QueryError`]. None of them are retried
//! internally; callers report them as-is.

use std::fmt;

use crate::catalog::CatalogError;
use crate::store::StoreError;

/// Result type for query specification operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Why a selected table was rejected during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRejection {
    /// The catalog has no table with this identifier.
    NotFound,
    /// The table exists but is flagged hidden.
    Hidden,
    /// The table only exists in another data source.
    OtherDataSource,
}

impl fmt::Display for TableRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableRejection::NotFound => write!(f, "does not exist"),
            TableRejection::Hidden => write!(f, "is hidden. You cannot query it"),
            TableRejection::OtherDataSource => write!(f, "is not in the same data source"),
        }
    }
}

/// Errors raised by the query specification core.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Table {table} {reason}")]
    InvalidTable {
        table: String,
        reason: TableRejection,
    },

    #[error("Limit must be greater than 0 (got {0})")]
    InvalidLimit(i64),

    #[error("Duplicate Column {label} at position {idx}")]
    DuplicateColumn { label: String, idx: usize },

    #[error("Lookup failed: {0}")]
    LookupFailure(String),

    #[error("Filter tree is nested deeper than {max_depth} levels")]
    FilterTooDeep { max_depth: usize },

    #[error("Cannot move column from {from} to {to}: only {len} columns")]
    InvalidMove { from: usize, to: usize, len: usize },

    #[error("Column {column} has a non-numeric value in row {row}")]
    NonNumericValue { column: String, row: usize },

    #[error("Query not found: {0}")]
    QueryNotFound(String),

    #[error("Query already exists: {0}")]
    QueryExists(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QueryError {
    /// Whether the error is one of the user-facing validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidTable { .. }
                | QueryError::InvalidLimit(_)
                | QueryError::DuplicateColumn { .. }
                | QueryError::FilterTooDeep { .. }
        )
    }
}
