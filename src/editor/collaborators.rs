//! Collaborators the editor calls out to.
//!
//! Compilation, execution and query-store synchronization live outside
//! this crate. Implementations report failures as plain messages, which
//! surface as [`QueryError::Collaborator`](crate::error::QueryError).

use crate::results::RawResultSet;
use crate::spec::QuerySpec;

/// Turns a validated specification into SQL text.
pub trait QueryCompiler {
    fn compile(&self, spec: &QuerySpec) -> Result<String, String>;
}

/// Runs SQL against a data source and returns the raw, row-major results.
pub trait QueryExecutor {
    fn execute(&self, data_source: &str, sql: &str) -> Result<RawResultSet, String>;
}

/// Re-synchronizes saved queries used as tables of the query store.
pub trait QueryStoreSync {
    fn sync(&self, queries: &[String], force: bool) -> Result<(), String>;
}
