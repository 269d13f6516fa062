//! Mapping between typed specifications and stored rows.
//!
//! Stored rows keep `filters`, table joins, column expressions and format
//! options as JSON text. Every load parses them back and every save
//! serializes them again. An absent join is stored as the empty string.

use serde::{Deserialize, Serialize};

use super::{StoreError, StoreResult};
use crate::columns::ColumnProjectionList;
use crate::spec::{ColumnSpec, FilterGroup, JoinSpec, Payload, QuerySpec, SortOrder, TableRef};
use crate::tables::TableJoinRegistry;

/// Document-level row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRow {
    pub name: String,
    pub data_source: String,
    pub limit_rows: Option<i64>,
    pub filters: String,
}

/// One selected table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub name: String,
    pub position: i64,
    pub table_name: String,
    pub label: String,
    pub join_spec: String,
}

/// One projected column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRow {
    pub name: String,
    pub idx: i64,
    pub column_type: String,
    pub label: String,
    pub table_name: String,
    pub table_label: String,
    pub column_name: Option<String>,
    pub is_expression: bool,
    pub expression: Option<String>,
    pub aggregation: Option<String>,
    pub aggregation_condition: Option<String>,
    pub format_option: Option<String>,
    pub order_by: Option<String>,
}

/// A whole document in stored form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuery {
    pub query: QueryRow,
    pub tables: Vec<TableRow>,
    pub columns: Vec<ColumnRow>,
}

impl StoredQuery {
    /// Serialize a specification into its stored form.
    pub fn from_spec(spec: &QuerySpec) -> StoreResult<Self> {
        let filters = serde_json::to_string_pretty(&spec.filters())?;

        let tables = spec
            .tables
            .iter()
            .enumerate()
            .map(|(position, table)| {
                Ok(TableRow {
                    name: table.name.clone(),
                    position: position as i64,
                    table_name: table.table.clone(),
                    label: table.label.clone(),
                    join_spec: match &table.join {
                        Some(join) => serde_json::to_string_pretty(join)?,
                        None => String::new(),
                    },
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        let columns = spec.columns.iter().map(ColumnRow::from_spec).collect();

        Ok(Self {
            query: QueryRow {
                name: spec.name.clone(),
                data_source: spec.data_source.clone(),
                limit_rows: spec.limit,
                filters,
            },
            tables,
            columns,
        })
    }

    /// Parse the stored form back into a specification.
    pub fn into_spec(self) -> StoreResult<QuerySpec> {
        let filters = if self.query.filters.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str::<FilterGroup>(&self.query.filters)?)
        };

        let mut tables = self.tables;
        tables.sort_by_key(|t| t.position);
        let tables = tables
            .into_iter()
            .map(|row| {
                let join = if row.join_spec.trim().is_empty() {
                    None
                } else {
                    Some(serde_json::from_str::<JoinSpec>(&row.join_spec)?)
                };
                Ok(TableRef {
                    name: row.name,
                    table: row.table_name,
                    label: row.label,
                    join,
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        let columns = self
            .columns
            .into_iter()
            .map(ColumnRow::into_spec)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(QuerySpec {
            name: self.query.name,
            data_source: self.query.data_source,
            tables: TableJoinRegistry::from_tables(tables),
            columns: ColumnProjectionList::from_columns(columns),
            filters,
            limit: self.query.limit_rows,
        })
    }
}

impl ColumnRow {
    fn from_spec(spec: &ColumnSpec) -> Self {
        Self {
            name: spec.name.clone(),
            idx: spec.idx as i64,
            column_type: spec.column_type.clone(),
            label: spec.label.clone(),
            table_name: spec.table.clone(),
            table_label: spec.table_label.clone(),
            column_name: spec.column.clone(),
            is_expression: spec.is_expression,
            expression: spec.expression.as_ref().map(Payload::to_text),
            aggregation: spec.aggregation.clone(),
            aggregation_condition: spec.aggregation_condition.clone(),
            format_option: spec.format_option.as_ref().map(Payload::to_text),
            order_by: spec.order_by.map(|o| o.as_str().to_string()),
        }
    }

    fn into_spec(self) -> StoreResult<ColumnSpec> {
        let order_by = match self.order_by.as_deref() {
            None | Some("") => None,
            Some(text) => Some(SortOrder::parse(text).ok_or_else(|| {
                StoreError::InvalidRow(format!(
                    "column {} has unknown sort order {}",
                    self.name, text
                ))
            })?),
        };

        Ok(ColumnSpec {
            idx: usize::try_from(self.idx).unwrap_or(0),
            name: self.name,
            column_type: self.column_type,
            label: self.label,
            table: self.table_name,
            table_label: self.table_label,
            column: self.column_name,
            is_expression: self.is_expression,
            expression: self.expression.as_deref().map(Payload::from_stored),
            aggregation: self.aggregation,
            aggregation_condition: self.aggregation_condition,
            format_option: self.format_option.as_deref().map(Payload::from_stored),
            order_by,
        })
    }
}
