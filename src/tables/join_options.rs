// src/tables/join_options.rs
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{ColumnInfo, SchemaCatalog, TableMetadata};
use crate::error::{QueryError, QueryResult};

/// A candidate key pair for joining two tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinKeyPair {
    /// Key column on the left table.
    pub left: String,
    /// Key column on the right table.
    pub right: String,
}

/// Everything needed to build a join between two tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOptions {
    pub left_columns: Vec<ColumnInfo>,
    pub right_columns: Vec<ColumnInfo>,
    /// Links the catalog declares from the left table to the right one.
    pub saved_links: Vec<JoinKeyPair>,
}

/// Look up both tables in `data_source` and collect their join options.
///
/// Either table missing from the catalog is a lookup failure.
pub fn fetch_join_options(
    catalog: &dyn SchemaCatalog,
    data_source: &str,
    left_table: &str,
    right_table: &str,
) -> QueryResult<JoinOptions> {
    let left = require_table(catalog, data_source, left_table)?;
    let right = require_table(catalog, data_source, right_table)?;

    let saved_links = left
        .links
        .iter()
        .filter(|link| link.foreign_table == right_table)
        .map(|link| JoinKeyPair {
            left: link.primary_key.clone(),
            right: link.foreign_key.clone(),
        })
        .collect();

    Ok(JoinOptions {
        left_columns: left.columns,
        right_columns: right.columns,
        saved_links,
    })
}

pub(crate) fn require_table(
    catalog: &dyn SchemaCatalog,
    data_source: &str,
    table: &str,
) -> QueryResult<TableMetadata> {
    match catalog.get_table(data_source, table)? {
        Some(metadata) => Ok(metadata),
        None => {
            warn!(table = %table, data_source = %data_source, "table missing from catalog");
            Err(QueryError::LookupFailure(format!(
                "Table {} not found in data source {}",
                table, data_source
            )))
        }
    }
}
