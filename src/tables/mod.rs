//! Selected tables and their joins.
//!
//! [`TableJoinRegistry`] owns the ordered table selection of a query. Rows
//! are matched by their row `name`, never by table identifier, since one
//! table can be selected twice under different labels.

mod join_options;

pub use join_options::{fetch_join_options, JoinKeyPair, JoinOptions};
pub(crate) use join_options::require_table;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::spec::{JoinSpec, NewTable, TableRef};

/// A table the query touches, either selected directly or joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTable {
    pub table: String,
    pub label: String,
}

/// Ordered table selection of a query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableJoinRegistry {
    tables: Vec<TableRef>,
}

impl TableJoinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: Vec<TableRef>) -> Self {
        Self { tables }
    }

    /// Append a table and return the generated row name.
    pub fn add(&mut self, table: NewTable) -> String {
        let name = uuid::Uuid::new_v4().to_string();
        self.tables.push(TableRef {
            name: name.clone(),
            table: table.table,
            label: table.label,
            join: None,
        });
        name
    }

    /// Append an existing row as-is.
    pub fn push(&mut self, table: TableRef) {
        self.tables.push(table);
    }

    /// Remove the row with this name. Returns whether a row matched.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.tables.iter().position(|t| t.name == name) {
            Some(pos) => {
                self.tables.remove(pos);
                true
            }
            None => {
                debug!(row = %name, "remove_table matched no row");
                false
            }
        }
    }

    /// Replace or clear the join of the row with this name.
    ///
    /// Returns whether a row matched.
    pub fn set_join(&mut self, name: &str, join: Option<JoinSpec>) -> bool {
        match self.tables.iter_mut().find(|t| t.name == name) {
            Some(row) => {
                row.join = join;
                true
            }
            None => {
                debug!(row = %name, "update_table matched no row");
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&TableRef> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TableRef> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Every table the query touches.
    ///
    /// The selected tables in order, followed by one entry per joined-in
    /// table, taken from the join's `with` target.
    pub fn resolve_selected_tables(&self) -> Vec<SelectedTable> {
        let selected = self.tables.iter().map(|t| SelectedTable {
            table: t.table.clone(),
            label: t.label.clone(),
        });
        let joined = self
            .tables
            .iter()
            .filter_map(|t| t.join.as_ref())
            .map(|join| SelectedTable {
                table: join.with.value.clone(),
                label: join.with.label.clone(),
            });
        selected.chain(joined).collect()
    }
}

impl<'a> IntoIterator for &'a TableJoinRegistry {
    type Item = &'a TableRef;
    type IntoIter = std::slice::Iter<'a, TableRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
