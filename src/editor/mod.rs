//! Query editing operations.
//!
//! [`QueryEditor`] is the operation surface callers drive. Every edit is one
//! load, apply, validate, persist cycle against the [`SpecStore`]:
//!
//! ```text
//! store.load(name) ──▶ apply edit ──▶ QuerySpecValidator ──▶ store.save(spec)
//! ```
//!
//! Fetch operations read the specification and consult the schema catalog
//! without persisting anything. Running a query hands the validated
//! specification to a [`QueryCompiler`] and [`QueryExecutor`] and shapes the
//! raw results for display.

mod collaborators;

pub use collaborators::{QueryCompiler, QueryExecutor, QueryStoreSync};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{ColumnValueSource, SchemaCatalog, TableInfo};
use crate::config::{EditorSettings, Settings};
use crate::error::{QueryError, QueryResult};
use crate::results::{shape, RawResultSet, ShapedResult};
use crate::spec::{
    sanitize_root, ColumnPatch, FilterGroup, JoinSpec, NewColumn, NewTable, QuerySpec,
};
use crate::store::SpecStore;
use crate::tables::{fetch_join_options, require_table, JoinOptions};
use crate::validation::{QuerySpecValidator, ValidationOptions};

/// A catalog column resolved against one of the query's tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumn {
    pub data_source: String,
    pub table_label: String,
    pub table: String,
    pub column: String,
    pub label: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

/// Input for a distinct-value lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnValuesRequest {
    /// Overrides the query's data source when set.
    pub data_source: Option<String>,
    pub table: String,
    pub column: String,
    pub search_text: Option<String>,
}

/// Edits and inspects stored query specifications.
pub struct QueryEditor<'a> {
    store: &'a dyn SpecStore,
    catalog: &'a dyn SchemaCatalog,
    values: Option<&'a dyn ColumnValueSource>,
    query_store_sync: Option<&'a dyn QueryStoreSync>,
    settings: EditorSettings,
    options: ValidationOptions,
}

impl<'a> QueryEditor<'a> {
    pub fn new(store: &'a dyn SpecStore, catalog: &'a dyn SchemaCatalog) -> Self {
        Self {
            store,
            catalog,
            values: None,
            query_store_sync: None,
            settings: EditorSettings::default(),
            options: ValidationOptions::default(),
        }
    }

    /// Apply the editor and validation sections of `settings`.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.settings = settings.editor.clone();
        self.options = settings.validation.options();
        self
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_value_source(mut self, values: &'a dyn ColumnValueSource) -> Self {
        self.values = Some(values);
        self
    }

    pub fn with_query_store_sync(mut self, sync: &'a dyn QueryStoreSync) -> Self {
        self.query_store_sync = Some(sync);
        self
    }

    fn validator(&self) -> QuerySpecValidator<'_> {
        QuerySpecValidator::new(self.catalog, self.options)
    }

    /// Load a stored specification.
    pub fn load(&self, name: &str) -> QueryResult<QuerySpec> {
        self.store
            .load(name)?
            .ok_or_else(|| QueryError::QueryNotFound(name.to_string()))
    }

    /// Load, apply `apply`, validate and persist.
    fn edit<T>(
        &self,
        name: &str,
        operation: &str,
        apply: impl FnOnce(&mut QuerySpec) -> QueryResult<T>,
    ) -> QueryResult<T> {
        let mut spec = self.load(name)?;
        let output = apply(&mut spec)?;
        self.validator().validate(&mut spec)?;
        let outcome = self.store.save(&spec)?;
        debug!(
            query = %name,
            operation = operation,
            revision = %outcome.revision(),
            "applied edit"
        );
        Ok(output)
    }

    /// Create and persist a new, empty specification.
    pub fn create(&self, name: &str, data_source: &str) -> QueryResult<QuerySpec> {
        if self.store.load(name)?.is_some() {
            return Err(QueryError::QueryExists(name.to_string()));
        }
        let mut spec = QuerySpec::new(name, data_source);
        self.validator().validate(&mut spec)?;
        self.store.save(&spec)?;
        info!(query = %name, data_source = %data_source, "created query");
        Ok(spec)
    }

    /// Delete a stored specification. Returns false if none was stored.
    pub fn delete(&self, name: &str) -> QueryResult<bool> {
        let deleted = self.store.delete(name)?;
        if deleted {
            info!(query = %name, "deleted query");
        }
        Ok(deleted)
    }

    /// Validate a stored specification without persisting it.
    pub fn validate(&self, name: &str) -> QueryResult<QuerySpec> {
        let mut spec = self.load(name)?;
        self.validator().validate(&mut spec)?;
        Ok(spec)
    }

    /// Select a table. Returns the new row's identity.
    pub fn add_table(&self, name: &str, table: NewTable) -> QueryResult<String> {
        self.edit(name, "add_table", |spec| Ok(spec.tables.add(table)))
    }

    /// Replace or clear the join of a selected table.
    ///
    /// Returns false, and changes nothing, if no row has `table_name`.
    pub fn update_table(
        &self,
        name: &str,
        table_name: &str,
        join: Option<JoinSpec>,
    ) -> QueryResult<bool> {
        self.edit(name, "update_table", |spec| {
            Ok(spec.tables.set_join(table_name, join))
        })
    }

    /// Remove a selected table. Unknown rows are ignored.
    pub fn remove_table(&self, name: &str, table_name: &str) -> QueryResult<bool> {
        self.edit(name, "remove_table", |spec| Ok(spec.tables.remove(table_name)))
    }

    /// Project a column. Returns the new row's identity.
    pub fn add_column(&self, name: &str, column: NewColumn) -> QueryResult<String> {
        self.edit(name, "add_column", |spec| Ok(spec.columns.add(column)))
    }

    /// Move the column at `from` to `to` (zero-based positions).
    pub fn move_column(&self, name: &str, from: usize, to: usize) -> QueryResult<()> {
        self.edit(name, "move_column", |spec| spec.columns.move_column(from, to))
    }

    /// Best-effort patch of a projected column. Unknown rows are ignored.
    pub fn update_column(
        &self,
        name: &str,
        column_name: &str,
        patch: ColumnPatch,
    ) -> QueryResult<bool> {
        self.edit(name, "update_column", |spec| {
            Ok(spec.columns.update(column_name, patch))
        })
    }

    /// Remove a projected column. Unknown rows are ignored.
    pub fn remove_column(&self, name: &str, column_name: &str) -> QueryResult<bool> {
        self.edit(name, "remove_column", |spec| {
            Ok(spec.columns.remove(column_name))
        })
    }

    /// Sanitize and store a new root filter group. Returns the stored group.
    pub fn update_filters(&self, name: &str, filters: FilterGroup) -> QueryResult<FilterGroup> {
        let max_depth = self.options.max_filter_depth;
        self.edit(name, "update_filters", |spec| {
            let sanitized = sanitize_root(&filters, max_depth)?;
            spec.filters = Some(sanitized.clone());
            Ok(sanitized)
        })
    }

    /// Restore the default filter group.
    pub fn reset(&self, name: &str) -> QueryResult<()> {
        self.edit(name, "reset", |spec| {
            spec.filters = Some(FilterGroup::default());
            Ok(())
        })
    }

    /// Tables of the query's data source.
    ///
    /// Query-backed tables are included when `allow_subquery` is set.
    pub fn fetch_tables(&self, name: &str) -> QueryResult<Vec<TableInfo>> {
        let spec = self.load(name)?;
        Ok(self
            .catalog
            .list_tables(&spec.data_source, self.settings.allow_subquery)?)
    }

    /// Catalog columns of every selected and joined-in table.
    pub fn fetch_columns(&self, name: &str) -> QueryResult<Vec<ResolvedColumn>> {
        let spec = self.load(name)?;
        self.sync_query_store(&spec)?;

        let mut columns = Vec::new();
        for selected in spec.tables.resolve_selected_tables() {
            let metadata = require_table(self.catalog, &spec.data_source, &selected.table)?;
            columns.extend(metadata.columns.into_iter().map(|c| ResolvedColumn {
                data_source: spec.data_source.clone(),
                table_label: selected.label.clone(),
                table: selected.table.clone(),
                column: c.column,
                label: c.label,
                column_type: c.column_type,
            }));
        }
        Ok(columns)
    }

    /// Distinct values of a column, for filter autocomplete.
    pub fn fetch_column_values(
        &self,
        name: &str,
        request: ColumnValuesRequest,
    ) -> QueryResult<Vec<String>> {
        let values = self.values.ok_or_else(|| {
            QueryError::Collaborator("no column value source configured".to_string())
        })?;
        let data_source = match request.data_source {
            Some(data_source) => data_source,
            None => self.load(name)?.data_source,
        };
        Ok(values.column_values(
            &data_source,
            &request.table,
            &request.column,
            request.search_text.as_deref(),
        )?)
    }

    /// Columns and declared links for joining `left_table` to `right_table`.
    pub fn fetch_join_options(
        &self,
        name: &str,
        left_table: &str,
        right_table: &str,
    ) -> QueryResult<JoinOptions> {
        let spec = self.load(name)?;
        fetch_join_options(self.catalog, &spec.data_source, left_table, right_table)
    }

    /// SQL for the validated specification.
    pub fn get_sql(&self, name: &str, compiler: &dyn QueryCompiler) -> QueryResult<String> {
        let spec = self.validate(name)?;
        compiler.compile(&spec).map_err(QueryError::Collaborator)
    }

    /// Compile, execute and shape the results of a stored specification.
    pub fn run(
        &self,
        name: &str,
        compiler: &dyn QueryCompiler,
        executor: &dyn QueryExecutor,
    ) -> QueryResult<ShapedResult> {
        let spec = self.validate(name)?;
        self.sync_query_store(&spec)?;

        let sql = compiler.compile(&spec).map_err(QueryError::Collaborator)?;
        debug!(query = %name, sql = %sql, "compiled query");
        let results = executor
            .execute(&spec.data_source, &sql)
            .map_err(QueryError::Collaborator)?;
        info!(query = %name, rows = results.rows.len(), "executed query");

        shape(results, spec.columns.as_slice())
    }

    /// Apply cumulative aggregation and column typing to raw results.
    pub fn shape_results(&self, name: &str, results: RawResultSet) -> QueryResult<ShapedResult> {
        let spec = self.load(name)?;
        shape(results, spec.columns.as_slice())
    }

    /// Re-sync saved queries used as tables before reading a query-store query.
    fn sync_query_store(&self, spec: &QuerySpec) -> QueryResult<()> {
        if spec.data_source != self.settings.query_store {
            return Ok(());
        }
        let Some(sync) = self.query_store_sync else {
            return Ok(());
        };

        let queries: Vec<String> = spec
            .tables
            .iter()
            .filter(|t| t.table != spec.name)
            .map(|t| t.table.clone())
            .collect();
        sync.sync(&queries, true).map_err(QueryError::Collaborator)?;
        info!(query = %spec.name, tables = queries.len(), "synced query store");
        Ok(())
    }
}
