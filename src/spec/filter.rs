// src/spec/filter.rs
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Logical connective of a filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[default]
    #[serde(rename = "&&", alias = "AND", alias = "and")]
    And,
    #[serde(rename = "||", alias = "OR", alias = "or")]
    Or,
}

/// Type tag carried by every group node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupKind {
    #[default]
    LogicalExpression,
}

/// A node of the filter tree.
///
/// Any object carrying a `conditions` array is a group, whatever its other
/// fields hold; every other object is a leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterNode {
    /// Logical group; anything carrying a `conditions` list.
    Group(FilterGroup),
    /// Single condition, opaque to this crate.
    Leaf(Condition),
}

/// A logical AND/OR group of filter nodes.
///
/// Header fields are read leniently: a missing or unreadable `operator`,
/// `level` or `position` takes its default instead of failing the group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterGroup {
    #[serde(rename = "type")]
    pub kind: GroupKind,
    pub operator: LogicalOperator,
    pub level: u32,
    pub position: u32,
    pub conditions: Vec<FilterNode>,
}

/// A leaf condition (column, operator and value fields).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Condition(pub Map<String, Value>);

impl FilterGroup {
    /// Empty group with the given connective and placement.
    pub fn new(operator: LogicalOperator, level: u32, position: u32) -> Self {
        Self {
            kind: GroupKind::LogicalExpression,
            operator,
            level,
            position,
            conditions: Vec::new(),
        }
    }

    /// Append a child node.
    pub fn with(mut self, node: impl Into<FilterNode>) -> Self {
        self.conditions.push(node.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl FilterGroup {
    fn from_map<E: de::Error>(mut map: Map<String, Value>) -> Result<Self, E> {
        let conditions = match map.remove("conditions") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| FilterNode::deserialize(item).map_err(E::custom))
                .collect::<Result<Vec<_>, E>>()?,
            _ => return Err(E::missing_field("conditions")),
        };

        let operator = map
            .get("operator")
            .and_then(|v| LogicalOperator::deserialize(v).ok())
            .unwrap_or_default();

        Ok(Self {
            kind: GroupKind::LogicalExpression,
            operator,
            level: header_number(&map, "level"),
            position: header_number(&map, "position"),
            conditions,
        })
    }
}

fn header_number(map: &Map<String, Value>, key: &str) -> u32 {
    map.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or_default()
}

impl<'de> Deserialize<'de> for FilterGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        FilterGroup::from_map(map)
    }
}

impl<'de> Deserialize<'de> for FilterNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        if matches!(map.get("conditions"), Some(Value::Array(_))) {
            FilterGroup::from_map(map).map(FilterNode::Group)
        } else {
            Ok(FilterNode::Leaf(Condition(map)))
        }
    }
}

impl Default for FilterGroup {
    /// The canonical empty filter: an AND group at level 1, position 1.
    fn default() -> Self {
        Self::new(LogicalOperator::And, 1, 1)
    }
}

impl Condition {
    /// Build a condition from a JSON object. Non-objects yield an empty leaf.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Condition(map),
            _ => Condition::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<FilterGroup> for FilterNode {
    fn from(group: FilterGroup) -> Self {
        FilterNode::Group(group)
    }
}

impl From<Condition> for FilterNode {
    fn from(condition: Condition) -> Self {
        FilterNode::Leaf(condition)
    }
}

impl FilterNode {
    pub fn as_group(&self) -> Option<&FilterGroup> {
        match self {
            FilterNode::Group(group) => Some(group),
            FilterNode::Leaf(_) => None,
        }
    }
}
