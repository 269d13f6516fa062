// src/spec/table.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A table selected into the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    /// Row identity. Two rows may point at the same table under different labels.
    pub name: String,
    /// Underlying table identifier.
    pub table: String,
    /// Display name.
    pub label: String,
    /// How this table is joined to another selected table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<JoinSpec>,
}

/// Caller input for adding a table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewTable {
    pub label: String,
    pub table: String,
}

/// Join definition attached to a [`TableRef`].
///
/// Only the joined-in table is interpreted; join type and key conditions
/// are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinSpec {
    pub with: JoinTarget,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// The table being joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinTarget {
    /// Table identifier.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl JoinSpec {
    pub fn with_table(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            with: JoinTarget {
                value: value.into(),
                label: label.into(),
            },
            details: Map::new(),
        }
    }

    /// Attach an opaque detail (join type, condition, ...).
    pub fn detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

impl TableRef {
    pub fn new(name: impl Into<String>, table: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            label: label.into(),
            join: None,
        }
    }
}
