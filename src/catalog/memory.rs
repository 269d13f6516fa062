//! In-memory catalog, loadable from a JSON document.
//!
//! ```json
//! {
//!   "tables": [
//!     { "table": "orders", "data_source": "sales_db",
//!       "columns": [{ "column": "id", "label": "ID", "type": "Integer" }],
//!       "links": [{ "primary_key": "customer", "foreign_table": "customers", "foreign_key": "id" }] }
//!   ],
//!   "values": [
//!     { "data_source": "sales_db", "table": "orders", "column": "status", "values": ["Open", "Closed"] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::provider::{ColumnValueSource, SchemaCatalog};
use super::types::*;
use super::{CatalogError, CatalogResult};

/// Known distinct values of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnValues {
    pub data_source: String,
    pub table: String,
    pub column: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Catalog held entirely in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    #[serde(default)]
    tables: Vec<TableMetadata>,
    #[serde(default)]
    values: Vec<ColumnValues>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from its JSON form.
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_values(
        mut self,
        data_source: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
        values: Vec<String>,
    ) -> Self {
        self.values.push(ColumnValues {
            data_source: data_source.into(),
            table: table.into(),
            column: column.into(),
            values,
        });
        self
    }
}

impl SchemaCatalog for InMemoryCatalog {
    fn list_tables(
        &self,
        data_source: &str,
        include_query_tables: bool,
    ) -> CatalogResult<Vec<TableInfo>> {
        Ok(self
            .tables
            .iter()
            .map(|t| &t.info)
            .filter(|t| t.data_source == data_source && !t.hidden)
            .filter(|t| include_query_tables || !t.is_query_based)
            .cloned()
            .collect())
    }

    fn find_tables(&self, table: &str) -> CatalogResult<Vec<TableInfo>> {
        Ok(self
            .tables
            .iter()
            .filter(|t| t.info.table == table)
            .map(|t| t.info.clone())
            .collect())
    }

    fn get_table(&self, data_source: &str, table: &str) -> CatalogResult<Option<TableMetadata>> {
        Ok(self
            .tables
            .iter()
            .find(|t| t.info.data_source == data_source && t.info.table == table)
            .cloned())
    }
}

impl ColumnValueSource for InMemoryCatalog {
    fn column_values(
        &self,
        data_source: &str,
        table: &str,
        column: &str,
        search_text: Option<&str>,
    ) -> CatalogResult<Vec<String>> {
        let Some(entry) = self
            .values
            .iter()
            .find(|v| v.data_source == data_source && v.table == table && v.column == column)
        else {
            return Ok(Vec::new());
        };

        let needle = search_text.map(str::to_lowercase).unwrap_or_default();
        let mut values: Vec<String> = Vec::new();
        for value in &entry.values {
            if value.to_lowercase().contains(&needle) && !values.contains(value) {
                values.push(value.clone());
            }
        }
        Ok(values)
    }
}
