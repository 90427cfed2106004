//! Schema-less record type
//!
//! The unit of data the pipeline moves around: a flat-ish mapping of field
//! names to [`Value`]s. Field iteration order is deterministic (sorted) so
//! reconciliation and masking produce reproducible output; ordering between
//! *sources* is carried separately by the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Value;

/// A resolved record: field name -> value, no fixed schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Insert or replace a field
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Remove a field, returning its previous value
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Whether a field is present
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Builder-style insert, for seeding fixtures
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in deterministic (sorted) order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Field names in deterministic order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Consume the record, yielding its fields
    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl From<serde_json::Value> for Record {
    /// Build a record from a JSON object; non-object values yield an empty
    /// record.
    fn from(json: serde_json::Value) -> Self {
        match Value::from(json) {
            Value::Map(fields) => Self { fields },
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_get_remove() {
        let mut record = Record::new();
        record.insert("email", "a@b.com");
        record.insert("score", 720);

        assert_eq!(record.get("email").unwrap().as_str(), Some("a@b.com"));
        assert_eq!(record.get("score").unwrap().as_number(), Some(720.0));
        assert_eq!(record.len(), 2);

        let removed = record.remove("email");
        assert_eq!(removed.unwrap().as_str(), Some("a@b.com"));
        assert!(!record.contains("email"));
    }

    #[test]
    fn test_from_json_object() {
        let record = Record::from(json!({
            "customerId": "C-100",
            "address": { "city": "Oslo" }
        }));

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("customerId").unwrap().as_str(), Some("C-100"));
        assert!(record.get("address").unwrap().as_map().is_some());
    }

    #[test]
    fn test_from_json_scalar_is_empty() {
        let record = Record::from(json!("not an object"));
        assert!(record.is_empty());
    }

    #[test]
    fn test_deterministic_field_order() {
        let record = Record::new().with("zeta", 1).with("alpha", 2).with("mid", 3);
        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_serde_transparent() {
        let record = Record::new().with("name", "Bo").with("active", true);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, json!({ "active": true, "name": "Bo" }));

        let parsed: Record = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }
}
