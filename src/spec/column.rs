// src/spec/column.rs
use serde::{Deserialize, Serialize};

use super::payload::Payload;

/// Marker that flags an aggregation as a running total.
pub const CUMULATIVE_MARKER: &str = "Cumulative";

/// Sort directive for a projected column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// A projected column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Row identity.
    pub name: String,
    /// 1-based position, contiguous across the query's columns.
    pub idx: usize,
    /// Declared presentation type.
    #[serde(rename = "type", default)]
    pub column_type: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub table_label: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub is_expression: bool,
    #[serde(default)]
    pub expression: Option<Payload>,
    #[serde(default)]
    pub aggregation: Option<String>,
    #[serde(default)]
    pub aggregation_condition: Option<String>,
    #[serde(default)]
    pub format_option: Option<Payload>,
    #[serde(default)]
    pub order_by: Option<SortOrder>,
}

impl ColumnSpec {
    /// Whether the aggregation asks for a running total.
    pub fn is_cumulative(&self) -> bool {
        self.aggregation
            .as_deref()
            .is_some_and(|aggregation| aggregation.contains(CUMULATIVE_MARKER))
    }
}

/// Caller input for adding a column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewColumn {
    #[serde(rename = "type")]
    pub column_type: String,
    pub label: String,
    pub table: String,
    pub table_label: String,
    pub column: Option<String>,
    pub is_expression: bool,
    pub expression: Option<Payload>,
    pub aggregation: Option<String>,
    pub aggregation_condition: Option<String>,
    pub format_option: Option<Payload>,
    pub order_by: Option<SortOrder>,
}

impl NewColumn {
    /// A plain column reference.
    pub fn column(
        table: impl Into<String>,
        column: impl Into<String>,
        label: impl Into<String>,
        column_type: impl Into<String>,
    ) -> Self {
        Self {
            column_type: column_type.into(),
            label: label.into(),
            table: table.into(),
            column: Some(column.into()),
            ..Self::default()
        }
    }

    pub fn aggregated(mut self, aggregation: impl Into<String>) -> Self {
        self.aggregation = Some(aggregation.into());
        self
    }

    pub(crate) fn into_spec(self, name: String, idx: usize) -> ColumnSpec {
        ColumnSpec {
            name,
            idx,
            column_type: self.column_type,
            label: self.label,
            table: self.table,
            table_label: self.table_label,
            column: self.column,
            is_expression: self.is_expression,
            expression: self.expression,
            aggregation: self.aggregation,
            aggregation_condition: self.aggregation_condition,
            format_option: self.format_option,
            order_by: self.order_by,
        }
    }
}

/// Caller input for a best-effort column update.
///
/// Plain fields always overwrite the stored ones; `expression` and
/// `format_option` only overwrite when non-empty. `is_expression` is never
/// touched by an update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnPatch {
    #[serde(rename = "type")]
    pub column_type: String,
    pub label: String,
    pub table: String,
    pub table_label: String,
    pub column: Option<String>,
    pub order_by: Option<SortOrder>,
    pub aggregation: Option<String>,
    pub aggregation_condition: Option<String>,
    pub expression: Option<Payload>,
    pub format_option: Option<Payload>,
}

impl ColumnPatch {
    /// Start a patch from the current state of a column.
    pub fn from_spec(spec: &ColumnSpec) -> Self {
        Self {
            column_type: spec.column_type.clone(),
            label: spec.label.clone(),
            table: spec.table.clone(),
            table_label: spec.table_label.clone(),
            column: spec.column.clone(),
            order_by: spec.order_by,
            aggregation: spec.aggregation.clone(),
            aggregation_condition: spec.aggregation_condition.clone(),
            expression: None,
            format_option: None,
        }
    }

    pub(crate) fn apply(self, spec: &mut ColumnSpec) {
        spec.column_type = self.column_type;
        spec.label = self.label;
        spec.table = self.table;
        spec.column = self.column;
        spec.order_by = self.order_by;
        spec.aggregation = self.aggregation;
        spec.table_label = self.table_label;
        spec.aggregation_condition = self.aggregation_condition;
        if let Some(format_option) = self.format_option.filter(|p| !p.is_empty()) {
            spec.format_option = Some(format_option);
        }
        if let Some(expression) = self.expression.filter(|p| !p.is_empty()) {
            spec.expression = Some(expression);
        }
    }
}
