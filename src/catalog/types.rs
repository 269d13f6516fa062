//! Schema catalog records.

use serde::{Deserialize, Serialize};

/// A table known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table identifier.
    pub table: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Data source the table belongs to.
    pub data_source: String,
    /// Hidden tables cannot be queried.
    #[serde(default)]
    pub hidden: bool,
    /// Table backed by another saved query.
    #[serde(default)]
    pub is_query_based: bool,
}

/// A column of a catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub column: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub column_type: String,
}

/// A foreign-key link declared from one table to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLink {
    /// Key column on the declaring table.
    pub primary_key: String,
    /// Key column on the linked table.
    pub foreign_key: String,
    /// Linked table identifier.
    pub foreign_table: String,
    #[serde(default)]
    pub foreign_table_label: String,
}

/// Full catalog entry for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    #[serde(flatten)]
    pub info: TableInfo,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
    #[serde(default)]
    pub links: Vec<TableLink>,
}

impl TableMetadata {
    pub fn new(table: impl Into<String>, data_source: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            info: TableInfo {
                label: table.clone(),
                table,
                data_source: data_source.into(),
                hidden: false,
                is_query_based: false,
            },
            columns: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.info.hidden = true;
        self
    }

    pub fn query_based(mut self) -> Self {
        self.info.is_query_based = true;
        self
    }

    pub fn column(
        mut self,
        column: impl Into<String>,
        label: impl Into<String>,
        column_type: impl Into<String>,
    ) -> Self {
        self.columns.push(ColumnInfo {
            column: column.into(),
            label: label.into(),
            column_type: column_type.into(),
        });
        self
    }

    pub fn link(
        mut self,
        primary_key: impl Into<String>,
        foreign_table: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        let foreign_table = foreign_table.into();
        self.links.push(TableLink {
            primary_key: primary_key.into(),
            foreign_key: foreign_key.into(),
            foreign_table_label: foreign_table.clone(),
            foreign_table,
        });
        self
    }
}
