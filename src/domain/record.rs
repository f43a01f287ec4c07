//! Helpers for raw store records.
//!
//! The remote store returns untyped JSON rows whose identifier fields are
//! sometimes integers, sometimes strings, and occasionally absent on legacy
//! rows. These helpers centralize the tolerant reads every lookup needs.

use serde_json::Value;

/// Read a field as an integer, accepting JSON numbers and numeric strings.
#[must_use]
pub fn int_field(record: &Value, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The record's identifier under `id_field`, falling back to a generic
/// `id`, rendered as a string for uniform comparison.
#[must_use]
pub fn id_string(record: &Value, id_field: &str) -> Option<String> {
    let raw = record
        .get(id_field)
        .filter(|v| !v.is_null())
        .or_else(|| record.get("id").filter(|v| !v.is_null()))?;
    match raw {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Whether the record's identifier (table-specific or generic `id`)
/// matches `id`. Identifiers are compared as strings: the store holds a
/// mix of integer and string ids for the same table.
#[must_use]
pub fn id_matches(record: &Value, id_field: &str, id: &str) -> bool {
    id_string(record, id_field).is_some_and(|v| v == id.trim())
}

/// Find the first record whose identifier matches `id`.
#[must_use]
pub fn find_by_id<'a>(records: &'a [Value], id_field: &str, id: &str) -> Option<&'a Value> {
    records.iter().find(|r| id_matches(r, id_field, id))
}
