//! SchemaCatalog trait definition.
//!
//! The catalog abstracts over wherever table metadata lives. This crate
//! only reads it: table existence, hidden flags, data-source membership,
//! column lists and declared links.

use super::types::*;
use super::CatalogResult;

/// Read access to table metadata.
///
/// Calls are blocking from the caller's point of view.
///
/// # Example
///
/// ```ignore
/// use lens::catalog::{InMemoryCatalog, SchemaCatalog, TableMetadata};
///
/// let catalog = InMemoryCatalog::new()
///     .with_table(TableMetadata::new("orders", "sales_db").column("id", "ID", "Integer"));
///
/// let tables = catalog.list_tables("sales_db", false)?;
/// let orders = catalog.get_table("sales_db", "orders")?;
/// ```
pub trait SchemaCatalog {
    /// List the tables of a data source.
    ///
    /// Query-backed tables are only listed when `include_query_tables` is set.
    /// Hidden tables are never listed.
    fn list_tables(
        &self,
        data_source: &str,
        include_query_tables: bool,
    ) -> CatalogResult<Vec<TableInfo>>;

    /// Every catalog entry with this table identifier, across data sources.
    fn find_tables(&self, table: &str) -> CatalogResult<Vec<TableInfo>>;

    /// Complete metadata for a table of a data source.
    fn get_table(&self, data_source: &str, table: &str) -> CatalogResult<Option<TableMetadata>>;

    /// Columns of a table of a data source, if the table exists.
    fn get_columns(
        &self,
        data_source: &str,
        table: &str,
    ) -> CatalogResult<Option<Vec<ColumnInfo>>> {
        Ok(self.get_table(data_source, table)?.map(|t| t.columns))
    }
}

/// Distinct-value lookups used for filter autocomplete.
pub trait ColumnValueSource {
    fn column_values(
        &self,
        data_source: &str,
        table: &str,
        column: &str,
        search_text: Option<&str>,
    ) -> CatalogResult<Vec<String>>;
}
