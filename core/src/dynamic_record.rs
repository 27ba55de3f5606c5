//! JSON-backed records addressed by dotted paths.
//!
//! Used for loosely shaped fixture data that has no typed view yet. Any
//! path parses; a path that resolves to nothing reads as `Missing`, so
//! sorting on it leaves rows in input order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{ConsoleError, ConsoleResult},
    record::{Record, RecordField},
    value::FieldValue,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    path: String,
    timestamp: bool,
}

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), timestamp: false }
    }

    /// A path whose string values are ISO 8601 instants.
    pub fn timestamp(path: impl Into<String>) -> Self {
        Self { path: path.into(), timestamp: true }
    }

    pub fn is_timestamp(&self) -> bool {
        self.timestamp
    }
}

impl RecordField for FieldPath {
    fn path(&self) -> &str {
        &self.path
    }

    fn parse(path: &str) -> Option<Self> {
        Some(Self::new(path))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct DynamicRecord {
    id: String,
    fields: Map<String, Value>,
}

impl DynamicRecord {
    /// Build from a JSON object. The object must carry a string or numeric `id`.
    pub fn from_json(value: Value) -> ConsoleResult<Self> {
        match value {
            Value::Object(map) => Self::try_from(map),
            other => Err(anyhow::anyhow!("Expected a JSON object record, got {other}").into()),
        }
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = self.fields.get(parts.next()?)?;
        parts.try_fold(first, |node, part| node.as_object()?.get(part))
    }

    /// Copy with one top-level or nested field replaced. Intermediate
    /// objects are created as needed.
    pub fn with_value(&self, path: &str, value: Value) -> Self {
        let mut next = self.clone();
        let mut parts: Vec<&str> = path.split('.').collect();
        let Some(leaf) = parts.pop() else {
            return next;
        };
        let mut node = &mut next.fields;
        for part in parts {
            let entry = node
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            node = match entry {
                Value::Object(map) => map,
                _ => unreachable!("entry was just made an object"),
            };
        }
        node.insert(leaf.to_string(), value);
        next
    }
}

impl TryFrom<Map<String, Value>> for DynamicRecord {
    type Error = ConsoleError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match fields.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(anyhow::anyhow!("Record is missing a string 'id'").into()),
        };
        Ok(Self { id, fields })
    }
}

impl From<DynamicRecord> for Map<String, Value> {
    fn from(record: DynamicRecord) -> Self {
        record.fields
    }
}

impl Record for DynamicRecord {
    type Field = FieldPath;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: &FieldPath) -> FieldValue {
        match self.get(&field.path) {
            Some(Value::String(s)) if field.timestamp => FieldValue::timestamp_from_str(s),
            Some(Value::String(s)) => FieldValue::text(s.as_str()),
            Some(Value::Number(n)) => n.as_f64().map_or(FieldValue::Missing, FieldValue::Number),
            Some(Value::Bool(b)) => FieldValue::Bool(*b),
            _ => FieldValue::Missing,
        }
    }

    fn search_fields() -> &'static [FieldPath] {
        &[]
    }

    /// With no designated fields, every string leaf is searchable.
    fn matches_search(&self, needle_lower: &str, fields: &[FieldPath]) -> bool {
        if fields.is_empty() {
            return self.fields.values().any(|v| value_contains(v, needle_lower));
        }
        fields
            .iter()
            .any(|f| self.field(f).contains_ci(needle_lower))
    }
}

fn value_contains(value: &Value, needle_lower: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle_lower),
        Value::Array(items) => items.iter().any(|v| value_contains(v, needle_lower)),
        Value::Object(map) => map.values().any(|v| value_contains(v, needle_lower)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn walks_nested_paths() {
        let r = DynamicRecord::from_json(json!({
            "id": "a1",
            "performance": { "recoveryRate": 92.5 }
        }))
        .unwrap();
        assert_eq!(
            r.field(&FieldPath::new("performance.recoveryRate")),
            FieldValue::Number(92.5)
        );
        assert!(r.field(&FieldPath::new("performance.missing")).is_missing());
        assert!(r.field(&FieldPath::new("nope.deeper")).is_missing());
    }

    #[test]
    fn numeric_id_is_accepted() {
        let r = DynamicRecord::from_json(json!({ "id": 7 })).unwrap();
        assert_eq!(r.id(), "7");
    }

    #[test]
    fn record_without_id_is_rejected() {
        assert!(DynamicRecord::from_json(json!({ "name": "x" })).is_err());
        assert!(DynamicRecord::from_json(json!([1, 2])).is_err());
    }

    #[test]
    fn with_value_creates_intermediate_objects() {
        let r = DynamicRecord::from_json(json!({ "id": "a" })).unwrap();
        let r2 = r.with_value("performance.recoveryRate", json!(50.0));
        assert_eq!(r2.get("performance.recoveryRate"), Some(&json!(50.0)));
        assert!(r.get("performance").is_none(), "original untouched");
    }

    #[test]
    fn timestamp_paths_parse_instants() {
        let r = DynamicRecord::from_json(json!({ "id": "a", "createdAt": "2024-05-01" })).unwrap();
        assert!(matches!(
            r.field(&FieldPath::timestamp("createdAt")),
            FieldValue::Timestamp(_)
        ));
        assert!(matches!(r.field(&FieldPath::new("createdAt")), FieldValue::Text(_)));
    }
}
