//! Heuristic column type inference over raw result values.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RawResultSet;

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-+]?\d+$").unwrap());
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-+]?(\d+\.\d*|\.\d+)$").unwrap());
static DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?$").unwrap()
});
static TIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}(:\d{2}(\.\d+)?)?$").unwrap());

/// Presentation type inferred from values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InferredType {
    Integer,
    Decimal,
    Boolean,
    Date,
    Datetime,
    Time,
    String,
}

impl InferredType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferredType::Integer => "Integer",
            InferredType::Decimal => "Decimal",
            InferredType::Boolean => "Boolean",
            InferredType::Date => "Date",
            InferredType::Datetime => "Datetime",
            InferredType::Time => "Time",
            InferredType::String => "String",
        }
    }

    /// Type of a single value; `None` for nulls.
    pub fn of_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(InferredType::Boolean),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(InferredType::Integer),
            Value::Number(_) => Some(InferredType::Decimal),
            Value::String(s) => Some(Self::of_text(s.trim())),
            Value::Array(_) | Value::Object(_) => Some(InferredType::String),
        }
    }

    fn of_text(text: &str) -> Self {
        if INTEGER.is_match(text) {
            InferredType::Integer
        } else if DECIMAL.is_match(text) {
            InferredType::Decimal
        } else if DATE.is_match(text) {
            InferredType::Date
        } else if DATETIME.is_match(text) {
            InferredType::Datetime
        } else if TIME.is_match(text) {
            InferredType::Time
        } else {
            InferredType::String
        }
    }

    /// Common type of two observations.
    fn merge(self, other: Self) -> Self {
        use InferredType::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Integer, Decimal) | (Decimal, Integer) => Decimal,
            (Date, Datetime) | (Datetime, Date) => Datetime,
            _ => String,
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer the type of one column's values. Nulls are ignored; a column
/// without values is a string column.
pub fn infer_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> InferredType {
    values
        .into_iter()
        .filter_map(InferredType::of_value)
        .reduce(InferredType::merge)
        .unwrap_or(InferredType::String)
}

/// Inferred type per result column, in header order.
pub fn infer_column_types(results: &RawResultSet) -> Vec<(String, InferredType)> {
    results
        .header
        .iter()
        .enumerate()
        .map(|(pos, header)| {
            let values = results.rows.iter().filter_map(|row| row.get(pos));
            (header.label.clone(), infer_type(values))
        })
        .collect()
}
