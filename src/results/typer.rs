// src/results/typer.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::infer::{infer_column_types, InferredType};
use super::RawResultSet;
use crate::spec::ColumnSpec;

/// A result column ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayColumn {
    pub label: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub format_options: Value,
}

/// Type every result column.
///
/// A header matches a projected column when the column's label or raw name
/// equals the header label; the first match in list order wins and
/// supplies the type and format options. Unmatched headers get the
/// inferred type and empty format options. A matched column without format
/// options also gets `{}` rather than null, so every display column carries
/// an object.
pub fn type_columns(results: &RawResultSet, columns: &[ColumnSpec]) -> Vec<DisplayColumn> {
    if results.is_empty() {
        return Vec::new();
    }

    let inferred = infer_column_types(results);

    results
        .header
        .iter()
        .map(|header| {
            let matched = columns.iter().find(|spec| {
                spec.label == header.label || spec.column.as_deref() == Some(header.label.as_str())
            });

            match matched {
                Some(spec) => DisplayColumn {
                    label: header.label.clone(),
                    column_type: spec.column_type.clone(),
                    format_options: spec
                        .format_option
                        .as_ref()
                        .map(|p| p.to_value())
                        .unwrap_or_else(|| Value::Object(Map::new())),
                },
                None => {
                    let column_type = inferred
                        .iter()
                        .find(|(label, _)| *label == header.label)
                        .map(|(_, t)| *t)
                        .unwrap_or(InferredType::String);
                    DisplayColumn {
                        label: header.label.clone(),
                        column_type: column_type.to_string(),
                        format_options: Value::Object(Map::new()),
                    }
                }
            }
        })
        .collect()
}
