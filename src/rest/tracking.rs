//! Attribute storage with dirty tracking for partial updates.
//!
//! This module provides [`Record`], the state every resource instance owns:
//! its ordered attribute map, the set of keys changed locally since the last
//! load or save, the base path it was reached through, and the validation
//! messages of its last failed save.
//!
//! # How It Works
//!
//! Attributes loaded from the server start clean. Every write through
//! [`Record::set`] or [`Record::assign`] marks its key dirty; an update then
//! sends only the dirty keys. Merging a server response or calling
//! [`Record::mark_clean`] empties the dirty set again.
//!
//! # Example
//!
//! ```rust
//! use graycrm::rest::Record;
//! use serde_json::json;
//!
//! let mut record = Record::from_value(json!({"id": "abc", "first_name": "Ann", "company": "Acme"}));
//! assert!(!record.is_dirty());
//!
//! record.set("first_name", "Anna");
//! assert!(record.is_dirty());
//!
//! let changes = record.changed_fields();
//! assert_eq!(changes.get("first_name"), Some(&json!("Anna")));
//! assert!(changes.get("company").is_none());
//!
//! record.mark_clean();
//! assert!(!record.is_dirty());
//! ```

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::rest::path::id_to_param;

/// One record's attribute map, dirty set, and path context.
///
/// A record is new iff its `id` attribute is absent or `null`. Identity is
/// always derived from the attribute map, never stored separately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    attributes: Map<String, Value>,
    changed: Vec<String>,
    base_path: Option<String>,
    errors: HashMap<String, Vec<String>>,
}

impl Record {
    /// Creates an empty, new record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clean record from server data.
    ///
    /// An object is used as the attribute map; any other value yields an
    /// empty record.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let attributes = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// Sets the path prefix this record was reached through.
    #[must_use]
    pub fn with_base_path(mut self, base_path: Option<String>) -> Self {
        self.base_path = base_path;
        self
    }

    /// Returns the attribute map.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns the id as a path segment, or `None` for new records.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.attributes.get("id").and_then(id_to_param)
    }

    /// Returns `true` if the record has no id.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id().is_none()
    }

    /// Returns `true` if the record has an id.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        !self.is_new()
    }

    /// Returns the path prefix this record was reached through, if any.
    #[must_use]
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    /// Returns the raw value of an attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Returns an attribute decoded as `T`.
    ///
    /// A number that does not decode as `T` is retried as its decimal
    /// string, so integer ids read through `String` accessors. Missing keys,
    /// `null`, and values that do not decode as `T` all yield `None`.
    #[must_use]
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.attributes.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => serde_json::from_value(Value::Number(n.clone()))
                .ok()
                .or_else(|| serde_json::from_value(Value::String(n.to_string())).ok()),
            Some(value) => serde_json::from_value(value.clone()).ok(),
        }
    }

    /// Writes an attribute and marks it dirty.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        if !self.changed.contains(&key) {
            self.changed.push(key.clone());
        }
        self.attributes.insert(key, value.into());
    }

    /// Writes every entry of `attrs` as a dirty attribute.
    pub fn assign(&mut self, attrs: Map<String, Value>) {
        for (key, value) in attrs {
            self.set(key, value);
        }
    }

    /// Merges server data into the attribute map without marking it dirty.
    ///
    /// Non-object values are ignored.
    pub fn merge(&mut self, data: Value) {
        if let Value::Object(map) = data {
            for (key, value) in map {
                self.attributes.insert(key, value);
            }
        }
    }

    /// Replaces the whole attribute map with server data and clears dirt.
    pub fn replace(&mut self, data: Value) {
        self.attributes = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.changed.clear();
    }

    /// Clears the dirty set.
    pub fn mark_clean(&mut self) {
        self.changed.clear();
    }

    /// Returns `true` if any attribute changed since the last load or save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Returns the dirty keys in the order they were first written.
    #[must_use]
    pub fn changed_keys(&self) -> &[String] {
        &self.changed
    }

    /// Returns the dirty subset of the attribute map.
    #[must_use]
    pub fn changed_fields(&self) -> Map<String, Value> {
        self.changed
            .iter()
            .map(|key| {
                let value = self.attributes.get(key).cloned().unwrap_or(Value::Null);
                (key.clone(), value)
            })
            .collect()
    }

    /// Returns the validation messages of the last failed save.
    #[must_use]
    pub const fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    /// Records the validation messages of a failed save.
    pub fn set_errors(&mut self, errors: HashMap<String, Vec<String>>) {
        self.errors = errors;
    }

    /// Forgets any recorded validation messages.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Returns a copy of the attribute map as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_server_data_is_clean() {
        let record = Record::from_value(json!({"id": "1", "name": "VIP"}));
        assert!(!record.is_dirty());
        assert!(record.is_persisted());
    }

    #[test]
    fn test_identity_follows_id_attribute() {
        let mut record = Record::new();
        assert!(record.is_new());

        record.set("id", 42);
        assert!(record.is_persisted());
        assert_eq!(record.id(), Some("42".to_string()));

        record.set("id", Value::Null);
        assert!(record.is_new());
    }

    #[test]
    fn test_changed_fields_only_include_dirty_keys_in_write_order() {
        let mut record = Record::from_value(json!({"id": "1", "a": 1, "b": 2, "c": 3}));
        record.set("c", 30);
        record.set("a", 10);
        record.set("c", 31);

        let changed = record.changed_fields();
        let keys: Vec<&String> = changed.keys().collect();
        assert_eq!(keys, vec!["c", "a"]);
        assert_eq!(record.changed_fields().get("c"), Some(&json!(31)));
    }

    #[test]
    fn test_merge_does_not_mark_dirty() {
        let mut record = Record::from_value(json!({"id": "1", "name": "old"}));
        record.merge(json!({"name": "new", "updated_at": "2024-01-01T00:00:00Z"}));
        assert!(!record.is_dirty());
        assert_eq!(record.get("name"), Some(&json!("new")));
    }

    #[test]
    fn test_replace_drops_unknown_keys_and_dirt() {
        let mut record = Record::from_value(json!({"id": "1", "local": true}));
        record.set("name", "x");
        record.replace(json!({"id": "1", "name": "server"}));

        assert!(!record.is_dirty());
        assert!(record.get("local").is_none());
        assert_eq!(record.get("name"), Some(&json!("server")));
    }

    #[test]
    fn test_get_as_decodes_or_returns_none() {
        let record = Record::from_value(json!({"n": 5, "s": "x", "z": null}));
        assert_eq!(record.get_as::<i64>("n"), Some(5));
        assert_eq!(record.get_as::<i64>("s"), None);
        assert_eq!(record.get_as::<String>("z"), None);
        assert_eq!(record.get_as::<String>("missing"), None);
    }

    #[test]
    fn test_get_as_reads_numbers_as_strings() {
        let record = Record::from_value(json!({"owner_id": 42, "ratio": 1.5, "active": true}));
        assert_eq!(record.get_as::<String>("owner_id").as_deref(), Some("42"));
        assert_eq!(record.get_as::<u64>("owner_id"), Some(42));
        assert_eq!(record.get_as::<String>("ratio").as_deref(), Some("1.5"));
        assert_eq!(record.get_as::<String>("active"), None);
    }

    #[test]
    fn test_base_path_is_kept() {
        let record = Record::from_value(json!({"id": "f1"}))
            .with_base_path(Some("/contacts/abc/flags".to_string()));
        assert_eq!(record.base_path(), Some("/contacts/abc/flags"));
    }

    #[test]
    fn test_non_object_value_yields_empty_record() {
        let record = Record::from_value(json!([1, 2]));
        assert!(record.attributes().is_empty());
    }
}
