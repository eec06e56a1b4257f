//! Keyed lookup of data records for joining against geometry ids.

use serde_json::Value;
use std::collections::HashMap;

use crate::accessor::Accessor;

/// Canonical string form of a key value.
///
/// Integral floats key the same as integers, so `7` and `7.0` match.
pub fn canonical_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Some(format!("{}", f as i64)),
            _ => Some(n.to_string()),
        },
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Records keyed by an accessor over each record. Later records win on
/// duplicate keys; records whose key is undefined are skipped.
#[derive(Debug, Clone)]
pub struct DataIndex {
    key_field: Accessor,
    records: HashMap<String, Value>,
}

impl DataIndex {
    pub fn build(data: &[Value], key_field: &Accessor) -> Self {
        let records = data
            .iter()
            .filter_map(|record| {
                let key = key_field.resolve(record).as_ref().and_then(canonical_key)?;
                Some((key, record.clone()))
            })
            .collect();

        Self {
            key_field: key_field.clone(),
            records,
        }
    }

    pub fn key_field(&self) -> &Accessor {
        &self.key_field
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        canonical_key(key).and_then(|k| self.records.get(&k))
    }

    /// Numeric value resolved by `field` on the record keyed by `key`.
    pub fn value_of(&self, key: &Value, field: &Accessor) -> Option<f64> {
        field.resolve(self.get(key)?)?.as_f64()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
