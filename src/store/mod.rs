//! Query document persistence.
//!
//! The store is the persistence boundary of the editor. Documents are kept
//! in their stored form (see [`rows`]): the filter tree, table joins,
//! column expressions and format options are JSON text.
//!
//! # Design
//!
//! - [`SqliteSpecStore`] stores documents in `~/.lens/queries.db` by default
//! - versioned schema, a mismatching database is refused
//! - each save rewrites the whole document inside one transaction
//! - every document carries a SHA256 revision of its stored form; unchanged
//!   saves are skipped
//!
//! # Layout
//!
//! ```text
//! queries        (name, data_source, limit_rows, filters, revision)
//! query_tables   (query, name, position, table_name, label, join_spec)
//! query_columns  (query, name, idx, column_type, label, ..., format_option, order_by)
//! meta           (key, value)   -- 'version'
//! ```

mod hash;
mod memory;
pub mod rows;

pub use hash::compute_revision;
pub use memory::MemorySpecStore;
pub use rows::StoredQuery;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::spec::QuerySpec;
use rows::{ColumnRow, QueryRow, TableRow};

/// Current store schema version. Bump this when the layout changes.
const STORE_VERSION: i32 = 1;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to determine store directory")]
    NoStoreDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store schema version {found} does not match expected version {expected}")]
    VersionMismatch { found: i32, expected: i32 },

    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// What a save did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The document was written under this revision.
    Saved(String),
    /// The stored revision already matched; nothing was written.
    Unchanged(String),
}

impl SaveOutcome {
    pub fn revision(&self) -> &str {
        match self {
            SaveOutcome::Saved(revision) | SaveOutcome::Unchanged(revision) => revision,
        }
    }
}

/// Persistence collaborator for query documents.
///
/// A save is atomic per document. Ordering between concurrent writers is
/// the store's concern, not the editor's.
pub trait SpecStore {
    fn load(&self, name: &str) -> StoreResult<Option<QuerySpec>>;

    fn save(&self, spec: &QuerySpec) -> StoreResult<SaveOutcome>;

    /// Delete a document. Returns true if one was deleted.
    fn delete(&self, name: &str) -> StoreResult<bool>;

    /// Names of all stored documents.
    fn list(&self) -> StoreResult<Vec<String>>;
}

/// SQLite-backed document store.
pub struct SqliteSpecStore {
    conn: Connection,
}

impl SqliteSpecStore {
    /// Open or create the store at the default location.
    pub fn open_default() -> StoreResult<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open or create the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        debug!(path = %path.display(), "opened query store");
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Default database path, `~/.lens/queries.db`.
    pub fn default_path() -> StoreResult<PathBuf> {
        let base = dirs::home_dir().ok_or(StoreError::NoStoreDir)?;
        Ok(base.join(".lens").join("queries.db"))
    }

    /// Initialize the schema and check the version.
    fn init(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS queries (
                name TEXT PRIMARY KEY,
                data_source TEXT NOT NULL,
                limit_rows INTEGER,
                filters TEXT NOT NULL,
                revision TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS query_tables (
                query TEXT NOT NULL,
                name TEXT NOT NULL,
                position INTEGER NOT NULL,
                table_name TEXT NOT NULL,
                label TEXT NOT NULL,
                join_spec TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (query, name)
            );

            CREATE TABLE IF NOT EXISTS query_columns (
                query TEXT NOT NULL,
                name TEXT NOT NULL,
                idx INTEGER NOT NULL,
                column_type TEXT NOT NULL,
                label TEXT NOT NULL,
                table_name TEXT NOT NULL,
                table_label TEXT NOT NULL,
                column_name TEXT,
                is_expression INTEGER NOT NULL DEFAULT 0,
                expression TEXT,
                aggregation TEXT,
                aggregation_condition TEXT,
                format_option TEXT,
                order_by TEXT,
                PRIMARY KEY (query, name)
            );
            ",
        )?;

        let stored_version: Option<i32> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = 'version'", [], |row| {
                let s: String = row.get(0)?;
                Ok(s.parse().unwrap_or(0))
            })
            .optional()?;

        match stored_version {
            Some(v) if v == STORE_VERSION => Ok(()),
            Some(found) => Err(StoreError::VersionMismatch {
                found,
                expected: STORE_VERSION,
            }),
            None => {
                self.conn.execute(
                    "INSERT OR REPLACE INTO meta (key, value) VALUES ('version', ?)",
                    params![STORE_VERSION.to_string()],
                )?;
                Ok(())
            }
        }
    }

    /// Stored revision of a document.
    pub fn revision(&self, name: &str) -> StoreResult<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT revision FROM queries WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Load a document in its stored form.
    pub fn load_stored(&self, name: &str) -> StoreResult<Option<StoredQuery>> {
        let query = self
            .conn
            .query_row(
                "SELECT name, data_source, limit_rows, filters FROM queries WHERE name = ?",
                params![name],
                |row| {
                    Ok(QueryRow {
                        name: row.get(0)?,
                        data_source: row.get(1)?,
                        limit_rows: row.get(2)?,
                        filters: row.get(3)?,
                    })
                },
            )
            .optional()?;

        let Some(query) = query else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT name, position, table_name, label, join_spec
             FROM query_tables WHERE query = ? ORDER BY position",
        )?;
        let tables = stmt
            .query_map(params![name], |row| {
                Ok(TableRow {
                    name: row.get(0)?,
                    position: row.get(1)?,
                    table_name: row.get(2)?,
                    label: row.get(3)?,
                    join_spec: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT name, idx, column_type, label, table_name, table_label, column_name,
                    is_expression, expression, aggregation, aggregation_condition,
                    format_option, order_by
             FROM query_columns WHERE query = ? ORDER BY idx",
        )?;
        let columns = stmt
            .query_map(params![name], |row| {
                Ok(ColumnRow {
                    name: row.get(0)?,
                    idx: row.get(1)?,
                    column_type: row.get(2)?,
                    label: row.get(3)?,
                    table_name: row.get(4)?,
                    table_label: row.get(5)?,
                    column_name: row.get(6)?,
                    is_expression: row.get(7)?,
                    expression: row.get(8)?,
                    aggregation: row.get(9)?,
                    aggregation_condition: row.get(10)?,
                    format_option: row.get(11)?,
                    order_by: row.get(12)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(StoredQuery {
            query,
            tables,
            columns,
        }))
    }

    fn write(&self, doc: &StoredQuery, revision: &str) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let name = &doc.query.name;

        tx.execute(
            "INSERT OR REPLACE INTO queries (name, data_source, limit_rows, filters, revision)
             VALUES (?, ?, ?, ?, ?)",
            params![
                name,
                doc.query.data_source,
                doc.query.limit_rows,
                doc.query.filters,
                revision
            ],
        )?;

        tx.execute("DELETE FROM query_tables WHERE query = ?", params![name])?;
        for table in &doc.tables {
            tx.execute(
                "INSERT INTO query_tables (query, name, position, table_name, label, join_spec)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    name,
                    table.name,
                    table.position,
                    table.table_name,
                    table.label,
                    table.join_spec
                ],
            )?;
        }

        tx.execute("DELETE FROM query_columns WHERE query = ?", params![name])?;
        for column in &doc.columns {
            tx.execute(
                "INSERT INTO query_columns (query, name, idx, column_type, label, table_name,
                    table_label, column_name, is_expression, expression, aggregation,
                    aggregation_condition, format_option, order_by)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    name,
                    column.name,
                    column.idx,
                    column.column_type,
                    column.label,
                    column.table_name,
                    column.table_label,
                    column.column_name,
                    column.is_expression,
                    column.expression,
                    column.aggregation,
                    column.aggregation_condition,
                    column.format_option,
                    column.order_by
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

impl SpecStore for SqliteSpecStore {
    fn load(&self, name: &str) -> StoreResult<Option<QuerySpec>> {
        match self.load_stored(name)? {
            Some(doc) => Ok(Some(doc.into_spec()?)),
            None => Ok(None),
        }
    }

    fn save(&self, spec: &QuerySpec) -> StoreResult<SaveOutcome> {
        let doc = StoredQuery::from_spec(spec)?;
        let revision = compute_revision(&doc)?;
        if self.revision(&spec.name)?.as_deref() == Some(revision.as_str()) {
            debug!(query = %spec.name, "query unchanged, skipping write");
            return Ok(SaveOutcome::Unchanged(revision));
        }

        self.write(&doc, &revision)?;
        info!(query = %spec.name, revision = %revision, "saved query");
        Ok(SaveOutcome::Saved(revision))
    }

    fn delete(&self, name: &str) -> StoreResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM query_tables WHERE query = ?", params![name])?;
        tx.execute("DELETE FROM query_columns WHERE query = ?", params![name])?;
        let rows = tx.execute("DELETE FROM queries WHERE name = ?", params![name])?;
        tx.commit()?;
        Ok(rows > 0)
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM queries ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}
