//! The host-owned configuration record for one resource instance.
//!
//! The host engine owns persistence and diffing; this type is only the view a
//! lifecycle callback reads from and writes to. Attribute values are JSON so
//! the record can round-trip through the host's state store unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier plus attribute values of a single resource instance.
///
/// An empty [`id`](Self::id) means the resource has not been created yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
}

impl ResourceData {
    /// Creates an empty record with no identifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from configured attribute values.
    pub fn from_attributes<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            id: String::new(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the stored resource identifier (empty before create).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Records the resource identifier.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Returns `true` when no identifier has been recorded.
    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }

    /// Returns a string attribute, or `""` when it is unset, null, or not a string.
    pub fn get_str(&self, key: &str) -> &str {
        self.attributes
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Returns a string attribute only when it is set and non-empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        Some(self.get_str(key)).filter(|v| !v.is_empty())
    }

    /// Sets an attribute value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Sets a string attribute when `value` is present; clears it otherwise.
    pub fn set_optional(&mut self, key: impl Into<String>, value: Option<&str>) {
        let key = key.into();
        match value {
            Some(v) => {
                self.attributes.insert(key, Value::from(v));
            }
            None => {
                self.attributes.remove(&key);
            }
        }
    }

    /// Returns `true` when the attribute is present and not null.
    pub fn is_set(&self, key: &str) -> bool {
        self.attributes.get(key).is_some_and(|v| !v.is_null())
    }

    /// Iterates attribute names and values in key order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_and_non_string_attributes_read_as_empty() {
        let mut data = ResourceData::from_attributes([("n", json!(3))]);
        data.set("null", Value::Null);
        assert_eq!(data.get_str("missing"), "");
        assert_eq!(data.get_str("n"), "");
        assert_eq!(data.get_str("null"), "");
        assert!(!data.is_set("null"));
        assert!(data.get_non_empty("missing").is_none());
    }

    #[test]
    fn state_document_round_trips() {
        let raw = json!({ "id": "abc", "attributes": { "project_id": "p" } });
        let data: ResourceData = serde_json::from_value(raw.clone()).expect("decode");
        assert_eq!(data.id(), "abc");
        assert_eq!(data.get_str("project_id"), "p");
        assert_eq!(serde_json::to_value(&data).expect("encode"), raw);
    }

    #[test]
    fn missing_id_means_new() {
        let data: ResourceData = serde_json::from_value(json!({ "attributes": {} })).expect("decode");
        assert!(data.is_new());
    }
}
