//! Patient registration operations. Pass-through create/read with
//! client-side lookup.

use crate::domain::{record, NewPatient, Patient, Table};
use crate::error::{Error, Result};
use crate::port::TableStore;

use super::{page, typed_rows, unwrap_created};

/// Register a patient. The store assigns `patient_id`.
pub async fn create(store: &dyn TableStore, new: &NewPatient) -> Result<Patient> {
    let payload = serde_json::to_value(new)?;
    let response = store.create(Table::Patients, &payload).await?;
    Ok(serde_json::from_value(unwrap_created(response))?)
}

/// List patients with client-side pagination.
pub async fn list(store: &dyn TableStore, skip: usize, limit: usize) -> Result<Vec<Patient>> {
    let records = store.fetch_all(Table::Patients).await?;
    Ok(page(typed_rows(Table::Patients, records), skip, limit))
}

/// Fetch one patient by id.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when no record matches.
pub async fn get(store: &dyn TableStore, patient_id: i64) -> Result<Patient> {
    let records = store.fetch_all(Table::Patients).await?;
    let record = record::find_by_id(&records, Table::Patients.id_field(), &patient_id.to_string())
        .cloned()
        .ok_or_else(|| Error::NotFound {
            entity: Table::Patients.entity(),
            id: patient_id.to_string(),
        })?;
    Ok(serde_json::from_value(record)?)
}
