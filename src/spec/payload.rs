//! Structured-or-text payloads.
//!
//! Column expressions and format options arrive from callers either as a
//! structured JSON value or as text that was already serialized. Both are
//! stored as text; structured values are pretty-printed, text is kept as-is.
//! Loading never changes the stored text: only text that is exactly the
//! pretty-printed form of its value comes back structured.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A column expression or format option.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Structured value, serialized when stored.
    Object(Value),
    /// Already-serialized text, stored unchanged.
    Text(String),
}

impl Payload {
    /// Wrap caller input. JSON strings are treated as pre-serialized text.
    pub fn from_input(value: Value) -> Self {
        match value {
            Value::String(text) => Payload::Text(text),
            other => Payload::Object(other),
        }
    }

    /// Rebuild a payload from stored text.
    ///
    /// A JSON object or array written in the pretty-printed form comes back
    /// structured. Any other text, including compact JSON supplied as text,
    /// stays text so that saving it again writes the same bytes.
    pub fn from_stored(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value @ (Value::Object(_) | Value::Array(_)))
                if serde_json::to_string_pretty(&value).is_ok_and(|pretty| pretty == text) =>
            {
                Payload::Object(value)
            }
            _ => Payload::Text(text.to_string()),
        }
    }

    /// Text form written to the store.
    pub fn to_text(&self) -> String {
        match self {
            Payload::Object(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Payload::Text(text) => text.clone(),
        }
    }

    /// JSON view of the payload.
    ///
    /// Text that parses as JSON is parsed, other text becomes a JSON string.
    pub fn to_value(&self) -> Value {
        match self {
            Payload::Object(value) => value.clone(),
            Payload::Text(text) => {
                serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone()))
            }
        }
    }

    /// Empty payloads are ignored by best-effort column updates.
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Object(Value::Null) => true,
            Payload::Object(Value::Object(map)) => map.is_empty(),
            Payload::Object(Value::Array(items)) => items.is_empty(),
            Payload::Object(_) => false,
            Payload::Text(text) => text.is_empty(),
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Payload::Object(value) => value.serialize(serializer),
            Payload::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Payload::from_input)
    }
}
