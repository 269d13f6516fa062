//! Post-execution result shaping.
//!
//! Raw results come back from the executor as rows of JSON values. The
//! first row is a header of `{label, ...}` descriptors; every following row
//! holds positional values.
//!
//! ```text
//! RawResultSet ──► apply_cumulative ──► type_columns ──► ShapedResult
//!                  (running sums)       (type + format options)
//! ```

pub mod cumulative;
pub mod infer;
pub mod typer;

pub use cumulative::apply_cumulative;
pub use infer::{infer_column_types, infer_type, InferredType};
pub use typer::{type_columns, DisplayColumn};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::QueryResult;
use crate::spec::ColumnSpec;

/// Header descriptor of one result column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultHeader {
    pub label: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResultHeader {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            extra: Map::new(),
        }
    }
}

/// Tabular result as returned by the executor.
///
/// Serializes to and from the executor's row-major form: the header row
/// followed by the body rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<Value>")]
pub struct RawResultSet {
    pub header: Vec<ResultHeader>,
    pub rows: Vec<Vec<Value>>,
}

impl RawResultSet {
    pub fn new(header: Vec<ResultHeader>, rows: Vec<Vec<Value>>) -> Self {
        Self { header, rows }
    }

    /// A result set is empty when the executor returned no header row.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    /// Position of a column by label.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.header.iter().position(|h| h.label == label)
    }
}

impl TryFrom<Vec<Value>> for RawResultSet {
    type Error = serde_json::Error;

    fn try_from(rows: Vec<Value>) -> Result<Self, Self::Error> {
        let mut rows = rows.into_iter();
        let Some(header) = rows.next() else {
            return Ok(Self::default());
        };
        let header: Vec<ResultHeader> = serde_json::from_value(header)?;
        let rows = rows
            .map(serde_json::from_value)
            .collect::<Result<Vec<Vec<Value>>, _>>()?;
        Ok(Self { header, rows })
    }
}

impl From<RawResultSet> for Vec<Value> {
    fn from(results: RawResultSet) -> Self {
        if results.header.is_empty() && results.rows.is_empty() {
            return Vec::new();
        }
        let header = results
            .header
            .into_iter()
            .map(|h| {
                let mut object = Map::new();
                object.insert("label".to_string(), Value::String(h.label));
                object.extend(h.extra);
                Value::Object(object)
            })
            .collect();
        std::iter::once(Value::Array(header))
            .chain(results.rows.into_iter().map(Value::Array))
            .collect()
    }
}

/// Results ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapedResult {
    pub columns: Vec<DisplayColumn>,
    pub rows: Vec<Vec<Value>>,
}

/// Apply cumulative aggregation, then type the result columns.
pub fn shape(results: RawResultSet, columns: &[ColumnSpec]) -> QueryResult<ShapedResult> {
    let results = apply_cumulative(results, columns)?;
    let display = type_columns(&results, columns);
    Ok(ShapedResult {
        columns: display,
        rows: results.rows,
    })
}
