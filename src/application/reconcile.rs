//! Idempotent partial updates against the remote store.
//!
//! The store's PUT replaces whatever fields it is sent and rejects
//! unknown rows, so updates here are reconciled first: fetch the current
//! record, keep only the candidate fields that actually differ, and skip
//! the write entirely when nothing does. The short-circuit makes repeated
//! identical updates free and sidesteps spurious 404s from writes
//! targeting values the store already holds.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{record, Table};
use crate::error::{Error, Result};
use crate::port::TableStore;

/// Fetch one record by identifier via a full-table scan.
///
/// The store supports no filtering, so the scan happens client-side,
/// matching on the table's id field with a generic `id` fallback.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when no record matches.
pub async fn fetch_record(store: &dyn TableStore, table: Table, id: &str) -> Result<Value> {
    let records = store.fetch_all(table).await?;
    record::find_by_id(&records, table.id_field(), id)
        .cloned()
        .ok_or_else(|| Error::NotFound {
            entity: table.entity(),
            id: id.to_string(),
        })
}

/// Apply a partial update, writing only the fields that differ.
///
/// Fields absent from `candidates` are never considered, whatever the
/// current record holds. An empty diff returns the current record with
/// zero writes; otherwise exactly one update call carries the differing
/// fields, and the canonical record is re-read afterwards
/// (read-after-write consistency is the store's contract, not enforced
/// here).
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the record does not exist: no write
/// is attempted in that case.
pub async fn reconcile(
    store: &dyn TableStore,
    table: Table,
    id: &str,
    candidates: Map<String, Value>,
) -> Result<Value> {
    let current = fetch_record(store, table, id).await?;

    let diff: Map<String, Value> = candidates
        .into_iter()
        .filter(|(key, value)| current.get(key).unwrap_or(&Value::Null) != value)
        .collect();

    if diff.is_empty() {
        debug!(table = %table, id = %id, "Update is a no-op, skipping write");
        return Ok(current);
    }

    debug!(table = %table, id = %id, fields = diff.len(), "Writing reconciled diff");
    store.update(table, id, &Value::Object(diff)).await?;
    fetch_record(store, table, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::InMemoryStore;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn seeded_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.seed(
            Table::Prescriptions,
            vec![json!({
                "prescription_id": "7",
                "patient_id": 1,
                "status": "pending",
                "notes": "take with food",
            })],
        );
        store
    }

    #[tokio::test]
    async fn identical_candidates_issue_no_write() {
        let store = seeded_store();

        let result = reconcile(
            &store,
            Table::Prescriptions,
            "7",
            map(json!({"status": "pending", "notes": "take with food"})),
        )
        .await
        .unwrap();

        assert_eq!(store.update_calls(), 0);
        assert_eq!(result["status"], "pending");
    }

    #[tokio::test]
    async fn single_differing_field_writes_exactly_once() {
        let store = seeded_store();

        let result = reconcile(
            &store,
            Table::Prescriptions,
            "7",
            map(json!({"status": "filled", "notes": "take with food"})),
        )
        .await
        .unwrap();

        assert_eq!(store.update_calls(), 1);
        assert_eq!(result["status"], "filled");
        // Unchanged fields survive untouched.
        assert_eq!(result["notes"], "take with food");
    }

    #[tokio::test]
    async fn missing_record_is_not_found_without_write() {
        let store = seeded_store();

        let err = reconcile(
            &store,
            Table::Prescriptions,
            "999",
            map(json!({"status": "filled"})),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn absent_field_with_non_null_candidate_counts_as_differing() {
        let store = seeded_store();

        let result = reconcile(
            &store,
            Table::Prescriptions,
            "7",
            map(json!({"expiry_date": "2026-09-05"})),
        )
        .await
        .unwrap();

        assert_eq!(store.update_calls(), 1);
        assert_eq!(result["expiry_date"], "2026-09-05");
    }

    #[tokio::test]
    async fn null_candidate_for_absent_field_is_a_no_op() {
        let store = seeded_store();

        reconcile(
            &store,
            Table::Prescriptions,
            "7",
            map(json!({"expiry_date": null})),
        )
        .await
        .unwrap();

        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn fetch_record_matches_generic_id_fallback() {
        let store = InMemoryStore::new();
        store.seed(Table::Patients, vec![json!({"id": 3, "name": "Ada"})]);

        let record = fetch_record(&store, Table::Patients, "3").await.unwrap();
        assert_eq!(record["name"], "Ada");
    }
}
