//! Client-side sequence allocation.
//!
//! The remote store has no auto-increment, so order identifiers are
//! computed here by scanning the table and taking max + 1. This is a
//! read-then-write with no compare-and-swap: two concurrent creations on
//! the same table can legitimately compute the same identifier. The race
//! is inherited behavior and must stay observable: adding client-side
//! locking would only hide the cross-process case (see DESIGN.md for the
//! remediation sketch).

use serde_json::Value;

/// Compute the next identifier for a table, as a string.
///
/// For each record the identifier is taken from `id_field`, falling back
/// to a generic `id` when that is missing or null. JSON integers and
/// integer-parsable strings both count; records with missing or
/// non-numeric identifiers are ignored. The result is `max + 1` when any
/// positive identifier was found, else `"1"`.
#[must_use]
pub fn next_id(id_field: &str, records: &[Value]) -> String {
    let mut max_id: i64 = 0;
    for record in records {
        if let Some(parsed) = candidate_id(record, id_field) {
            max_id = max_id.max(parsed);
        }
    }
    let next = if max_id > 0 { max_id + 1 } else { 1 };
    next.to_string()
}

fn candidate_id(record: &Value, id_field: &str) -> Option<i64> {
    let raw = record
        .get(id_field)
        .filter(|v| !v.is_null())
        .or_else(|| record.get("id"))?;
    match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
