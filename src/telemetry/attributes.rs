//! Typed attribute access for telemetry records.
//!
//! Attributes follow the OTLP JSON encoding: an ordered list of
//! `{"key": ..., "value": {"stringValue": ...}}` entries. The processor only
//! needs string reads and writes, expressed by [`AttributeAccess`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Narrow string accessor the processor depends on
pub trait AttributeAccess {
    /// String value of `key`, if present and a string
    fn get_str(&self, key: &str) -> Option<&str>;

    /// Set `key` to a string value, in place if it already exists
    fn put_str(&mut self, key: &str, value: String);
}

/// OTLP `AnyValue`; non-string variants are carried through untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl AnyValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: Some(value.into()),
            other: Map::new(),
        }
    }
}

/// One attribute entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,

    #[serde(default)]
    pub value: AnyValue,
}

/// Ordered attribute list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Vec<KeyValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }

    /// Builder-style string insert, mostly for constructing records in tests
    pub fn with_str(mut self, key: &str, value: impl Into<String>) -> Self {
        self.put_str(key, value.into());
        self
    }
}

impl AttributeAccess for Attributes {
    fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|kv| kv.key == key)
            .and_then(|kv| kv.value.string_value.as_deref())
    }

    fn put_str(&mut self, key: &str, value: String) {
        match self.0.iter_mut().find(|kv| kv.key == key) {
            Some(kv) => kv.value = AnyValue::string(value),
            None => self.0.push(KeyValue {
                key: key.to_string(),
                value: AnyValue::string(value),
            }),
        }
    }
}
