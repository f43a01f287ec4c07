//! Per-entity operations over the remote tables.
//!
//! The store supports whole-table reads only, so every filter, page, and
//! join here is computed client-side from a fresh fetch. Nothing is
//! cached between requests.

pub mod diagnoses;
pub mod facilities;
pub mod patients;
pub mod preferences;
pub mod prescriptions;
pub mod requisitions;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::domain::Table;

/// Client-side pagination, applied after the full-table fetch.
pub(crate) fn page<T>(records: Vec<T>, skip: usize, limit: usize) -> Vec<T> {
    records.into_iter().skip(skip).take(limit).collect()
}

/// Unwrap a create response that may echo the row inside a `data` list.
pub(crate) fn unwrap_created(body: Value) -> Value {
    match &body {
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(rows)) if !rows.is_empty() => rows[0].clone(),
            _ => body,
        },
        _ => body,
    }
}

/// Deserialize raw rows into typed records, skipping rows too mangled to
/// parse. Legacy rows with stray types should not take down a listing.
pub(crate) fn typed_rows<T: DeserializeOwned>(table: Table, records: Vec<Value>) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(record) {
            Ok(typed) => Some(typed),
            Err(err) => {
                warn!(table = %table, error = %err, "Skipping malformed row");
                None
            }
        })
        .collect()
}
