//! # Lens
//!
//! Editable query specifications for a BI query builder.
//!
//! ## Architecture
//!
//! A query specification is edited one operation at a time. Each edit is
//! loaded from the store, applied, validated against the schema catalog and
//! persisted again:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 QueryEditor (operations)                 │
//! │  add/update/remove table, add/move/update/remove column, │
//! │  update filters, reset, fetch tables/columns/values      │
//! └─────────────────────────────────────────────────────────┘
//!          │                    │                    │
//!          ▼ [tables]           ▼ [columns]          ▼ [spec::sanitize]
//! ┌─────────────────┐ ┌──────────────────┐ ┌───────────────────┐
//! │ TableJoinRegistry│ │ColumnProjection- │ │ FilterTree        │
//! │ (joins, resolve) │ │List (idx 1..N)   │ │ sanitizer         │
//! └─────────────────┘ └──────────────────┘ └───────────────────┘
//!                          │
//!                          ▼ [validation]
//! ┌─────────────────────────────────────────────────────────┐
//! │   QuerySpecValidator  (tables, limit, filters, labels)   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [store]
//! ┌─────────────────────────────────────────────────────────┐
//! │        SpecStore (SQLite, text-blob document rows)       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! After execution, raw results pass through [`results`]: running sums for
//! cumulative columns, then display types and format options.

pub mod catalog;
pub mod columns;
pub mod config;
pub mod editor;
pub mod error;
pub mod results;
pub mod spec;
pub mod store;
pub mod tables;
pub mod validation;

pub use error::{QueryError, QueryResult};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::{
        ColumnValueSource, InMemoryCatalog, SchemaCatalog, TableInfo, TableMetadata,
    };
    pub use crate::columns::ColumnProjectionList;
    pub use crate::config::Settings;
    pub use crate::editor::{
        ColumnValuesRequest, QueryCompiler, QueryEditor, QueryExecutor, QueryStoreSync,
        ResolvedColumn,
    };
    pub use crate::error::{QueryError, QueryResult, TableRejection};
    pub use crate::results::{shape, RawResultSet, ResultHeader, ShapedResult};
    pub use crate::spec::{
        ColumnPatch, ColumnSpec, FilterGroup, FilterNode, JoinSpec, LogicalOperator, NewColumn,
        NewTable, Payload, QuerySpec,
    };
    pub use crate::store::{MemorySpecStore, SpecStore, SqliteSpecStore};
    pub use crate::tables::TableJoinRegistry;
    pub use crate::validation::{QuerySpecValidator, ValidationOptions};
}
