//! Diagnosis operations: pass-through create plus client-side selection.

use crate::domain::{latest_diagnosis, record, Diagnosis, NewDiagnosis, Table};
use crate::error::Result;
use crate::port::TableStore;

use super::{typed_rows, unwrap_created};

/// Record a diagnosis. The store assigns `diagnosis_id`.
pub async fn create(store: &dyn TableStore, new: &NewDiagnosis) -> Result<Diagnosis> {
    let payload = serde_json::to_value(new)?;
    let response = store.create(Table::Diagnoses, &payload).await?;
    Ok(serde_json::from_value(unwrap_created(response))?)
}

/// Every diagnosis recorded for a patient, in table order.
pub async fn list_by_patient(store: &dyn TableStore, patient_id: i64) -> Result<Vec<Diagnosis>> {
    let records = store.fetch_all(Table::Diagnoses).await?;
    let matching = records
        .into_iter()
        .filter(|r| record::int_field(r, "patient_id") == Some(patient_id))
        .collect();
    Ok(typed_rows(Table::Diagnoses, matching))
}

/// The patient's most recent diagnosis by `(diagnosis_date, diagnosis_id)`
/// descending, or `None` when the patient has no diagnoses at all.
pub async fn latest_by_patient(
    store: &dyn TableStore,
    patient_id: i64,
) -> Result<Option<Diagnosis>> {
    let records = list_by_patient(store, patient_id).await?;
    Ok(latest_diagnosis(records))
}
