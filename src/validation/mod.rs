//! Validation of query specifications.
//!
//! Runs before every persist. Rules are applied in order and the first
//! failure wins:
//!
//! 1. every selected table exists, is visible and belongs to the query's
//!    data source
//! 2. the limit, when set, is at least 1
//! 3. missing filters are replaced by the canonical empty group
//! 4. the filter tree stays within the nesting bound
//! 5. column labels are unique (strict mode only)

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::SchemaCatalog;
use crate::error::{QueryError, QueryResult, TableRejection};
use crate::spec::sanitize::depth;
use crate::spec::{FilterGroup, FilterNode, QuerySpec, DEFAULT_MAX_FILTER_DEPTH};

/// Options threaded into validation instead of ambient flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Reject repeated column labels. Lenient mode is meant for fixtures.
    pub strict_labels: bool,
    /// Maximum nesting of filter groups.
    pub max_filter_depth: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            strict_labels: true,
            max_filter_depth: DEFAULT_MAX_FILTER_DEPTH,
        }
    }
}

impl ValidationOptions {
    /// Options with duplicate-label checks turned off.
    pub fn lenient() -> Self {
        Self {
            strict_labels: false,
            ..Self::default()
        }
    }
}

/// Validates a [`QuerySpec`] against the schema catalog.
pub struct QuerySpecValidator<'a> {
    catalog: &'a dyn SchemaCatalog,
    options: ValidationOptions,
}

impl<'a> QuerySpecValidator<'a> {
    pub fn new(catalog: &'a dyn SchemaCatalog, options: ValidationOptions) -> Self {
        Self { catalog, options }
    }

    /// Validate and normalize a specification.
    pub fn validate(&self, spec: &mut QuerySpec) -> QueryResult<()> {
        self.validate_tables(spec)?;
        validate_limit(spec)?;
        normalize_filters(spec);
        self.validate_filter_depth(spec)?;
        self.validate_columns(spec)?;
        debug!(query = %spec.name, "query specification is valid");
        Ok(())
    }

    fn validate_tables(&self, spec: &QuerySpec) -> QueryResult<()> {
        for row in &spec.tables {
            let candidates = self.catalog.find_tables(&row.table)?;
            let reject = |reason| QueryError::InvalidTable {
                table: row.table.clone(),
                reason,
            };

            let Some(table) = candidates
                .iter()
                .find(|t| t.data_source == spec.data_source)
            else {
                return Err(reject(if candidates.is_empty() {
                    TableRejection::NotFound
                } else {
                    TableRejection::OtherDataSource
                }));
            };

            if table.hidden {
                return Err(reject(TableRejection::Hidden));
            }
        }
        Ok(())
    }

    fn validate_filter_depth(&self, spec: &QuerySpec) -> QueryResult<()> {
        let max_depth = self.options.max_filter_depth;
        if let Some(filters) = &spec.filters {
            let root = FilterNode::Group(filters.clone());
            if depth(&root, max_depth) > max_depth {
                return Err(QueryError::FilterTooDeep { max_depth });
            }
        }
        Ok(())
    }

    fn validate_columns(&self, spec: &QuerySpec) -> QueryResult<()> {
        if !self.options.strict_labels {
            return Ok(());
        }

        let mut seen = HashSet::new();
        for column in &spec.columns {
            if column.label.is_empty() {
                continue;
            }
            if !seen.insert(column.label.as_str()) {
                return Err(QueryError::DuplicateColumn {
                    label: column.label.clone(),
                    idx: column.idx,
                });
            }
        }
        Ok(())
    }
}

fn validate_limit(spec: &QuerySpec) -> QueryResult<()> {
    match spec.limit {
        Some(limit) if limit < 1 => Err(QueryError::InvalidLimit(limit)),
        _ => Ok(()),
    }
}

fn normalize_filters(spec: &mut QuerySpec) {
    if spec.filters.is_none() {
        spec.filters = Some(FilterGroup::default());
    }
}
