//! Running-sum post-processing for cumulative aggregations.

use serde_json::{Number, Value};

use super::RawResultSet;
use crate::error::{QueryError, QueryResult};
use crate::spec::ColumnSpec;

/// Replace the values of every cumulative column with their running sum.
///
/// Results without any cumulative column, and empty results, are returned
/// untouched. Nulls keep their place and leave the running total as is.
pub fn apply_cumulative(
    mut results: RawResultSet,
    columns: &[ColumnSpec],
) -> QueryResult<RawResultSet> {
    // Each label is summed once, even if several columns share it.
    let mut flagged: Vec<&str> = Vec::new();
    for spec in columns.iter().filter(|c| c.is_cumulative()) {
        if !flagged.contains(&spec.label.as_str()) {
            flagged.push(&spec.label);
        }
    }
    if flagged.is_empty() || results.is_empty() {
        return Ok(results);
    }

    for label in flagged {
        let pos = results.position(label).ok_or_else(|| {
            QueryError::LookupFailure(format!("Column {} is not in the results", label))
        })?;

        let mut total = RunningTotal::Int(0);
        for (row, values) in results.rows.iter_mut().enumerate() {
            let Some(cell) = values.get_mut(pos) else {
                continue;
            };
            match cell {
                Value::Null => {}
                Value::Number(n) => {
                    total = total.add(n);
                    *cell = total.to_value();
                }
                _ => {
                    return Err(QueryError::NonNumericValue {
                        column: label.to_string(),
                        row: row + 1,
                    })
                }
            }
        }
    }

    Ok(results)
}

#[derive(Debug, Clone, Copy)]
enum RunningTotal {
    Int(i64),
    Float(f64),
}

impl RunningTotal {
    fn add(self, n: &Number) -> Self {
        match (self, n.as_i64()) {
            (RunningTotal::Int(total), Some(value)) => match total.checked_add(value) {
                Some(sum) => RunningTotal::Int(sum),
                None => RunningTotal::Float(total as f64 + value as f64),
            },
            (total, _) => RunningTotal::Float(total.as_f64() + n.as_f64().unwrap_or(0.0)),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            RunningTotal::Int(total) => total as f64,
            RunningTotal::Float(total) => total,
        }
    }

    fn to_value(self) -> Value {
        match self {
            RunningTotal::Int(total) => Value::from(total),
            RunningTotal::Float(total) => Number::from_f64(total).map_or(Value::Null, Value::Number),
        }
    }
}
