//! Projected columns of a query.
//!
//! [`ColumnProjectionList`] keeps column `idx` values equal to `1..=N` in
//! sequence order after every structural change. Updates and removals that
//! match no row are silent no-ops.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::spec::{ColumnPatch, ColumnSpec, NewColumn};

/// Ordered column specifications of a query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnProjectionList {
    columns: Vec<ColumnSpec>,
}

impl ColumnProjectionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored rows, ordering them by their persisted `idx`.
    pub fn from_columns(mut columns: Vec<ColumnSpec>) -> Self {
        columns.sort_by_key(|c| c.idx);
        let mut list = Self { columns };
        list.renumber();
        list
    }

    /// Append a column and return the generated row name.
    pub fn add(&mut self, column: NewColumn) -> String {
        let name = uuid::Uuid::new_v4().to_string();
        let idx = self.columns.len() + 1;
        self.columns.push(column.into_spec(name.clone(), idx));
        name
    }

    /// Remove the row with this name. Returns whether a row matched.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(pos) = self.columns.iter().position(|c| c.name == name) else {
            debug!(row = %name, "remove_column matched no row");
            return false;
        };
        self.columns.remove(pos);
        self.renumber();
        true
    }

    /// Patch the row with this name. Returns whether a row matched.
    pub fn update(&mut self, name: &str, patch: ColumnPatch) -> bool {
        let Some(column) = self.columns.iter_mut().find(|c| c.name == name) else {
            debug!(row = %name, "update_column matched no row");
            return false;
        };
        patch.apply(column);
        true
    }

    /// Move the column at `from` to position `to` (both 0-based).
    pub fn move_column(&mut self, from: usize, to: usize) -> QueryResult<()> {
        let len = self.columns.len();
        if from >= len || to >= len {
            return Err(QueryError::InvalidMove { from, to, len });
        }
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        self.renumber();
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnSpec> {
        self.columns.iter()
    }

    pub fn as_slice(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn renumber(&mut self) {
        for (pos, column) in self.columns.iter_mut().enumerate() {
            column.idx = pos + 1;
        }
    }
}

impl<'a> IntoIterator for &'a ColumnProjectionList {
    type Item = &'a ColumnSpec;
    type IntoIter = std::slice::Iter<'a, ColumnSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
