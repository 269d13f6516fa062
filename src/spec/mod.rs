//! Query specification types.
//!
//! A [`QuerySpec`] is the aggregate root edited by users: selected tables
//! and their joins, projected columns, the filter tree and an optional row
//! limit.

pub mod column;
pub mod filter;
pub mod payload;
pub mod sanitize;
pub mod table;

pub use column::{ColumnPatch, ColumnSpec, NewColumn, SortOrder, CUMULATIVE_MARKER};
pub use filter::{Condition, FilterGroup, FilterNode, GroupKind, LogicalOperator};
pub use payload::Payload;
pub use sanitize::{depth, sanitize, sanitize_root, DEFAULT_MAX_FILTER_DEPTH};
pub use table::{JoinSpec, JoinTarget, NewTable, TableRef};

use serde::{Deserialize, Serialize};

use crate::columns::ColumnProjectionList;
use crate::tables::TableJoinRegistry;

/// A user-editable query specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Document identifier.
    pub name: String,
    /// Schema/connection the query runs against.
    pub data_source: String,
    #[serde(default)]
    pub tables: TableJoinRegistry,
    #[serde(default)]
    pub columns: ColumnProjectionList,
    /// Root filter group. Absent only until the query is validated.
    #[serde(default)]
    pub filters: Option<FilterGroup>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl QuerySpec {
    /// A new, empty specification with the default filter group.
    pub fn new(name: impl Into<String>, data_source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_source: data_source.into(),
            tables: TableJoinRegistry::new(),
            columns: ColumnProjectionList::new(),
            filters: Some(FilterGroup::default()),
            limit: None,
        }
    }

    /// The root filter group, or the canonical empty group when unset.
    pub fn filters(&self) -> FilterGroup {
        self.filters.clone().unwrap_or_default()
    }

    pub fn has_cumulative_columns(&self) -> bool {
        self.columns.iter().any(ColumnSpec::is_cumulative)
    }
}
