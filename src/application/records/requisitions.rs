//! Requisition form operations, mirroring the prescription set with the
//! lab as the joined facility.

use serde_json::Value;
use tracing::info;

use crate::application::{reconcile, sequence};
use crate::domain::{
    FacilityKind, NewRequisition, RequisitionForm, RequisitionUpdate, RequisitionWithLab, Table,
};
use crate::error::{Error, Result};
use crate::port::TableStore;

use super::{facilities, page, typed_rows};

/// Create a requisition with a freshly allocated identifier.
pub async fn create(store: &dyn TableStore, new: &NewRequisition) -> Result<RequisitionForm> {
    let records = store.fetch_all(Table::Requisitions).await?;
    let id = sequence::next_id(Table::Requisitions.id_field(), &records);

    let mut payload = serde_json::to_value(new)?;
    payload[Table::Requisitions.id_field()] = Value::String(id.clone());

    store.create(Table::Requisitions, &payload).await?;
    info!(requisition_id = %id, patient_id = new.patient_id, "Requisition created");
    Ok(serde_json::from_value(payload)?)
}

/// Fetch one requisition row without the lab join.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when no record matches.
pub async fn get_form(store: &dyn TableStore, id: &str) -> Result<RequisitionForm> {
    let record = reconcile::fetch_record(store, Table::Requisitions, id).await?;
    Ok(serde_json::from_value(record)?)
}

/// Fetch one requisition with its lab's name and plain address.
pub async fn get(store: &dyn TableStore, id: &str) -> Result<RequisitionWithLab> {
    let form = get_form(store, id).await?;
    join_lab(store, form).await
}

/// List requisitions with the lab join, paged client-side.
pub async fn list(
    store: &dyn TableStore,
    skip: usize,
    limit: usize,
) -> Result<Vec<RequisitionWithLab>> {
    let records = store.fetch_all(Table::Requisitions).await?;
    let forms: Vec<RequisitionForm> = page(typed_rows(Table::Requisitions, records), skip, limit);
    join_labs(store, forms).await
}

/// The patient's most recent requisition by `(date_requested, id)`
/// descending, with the lab join.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the patient has none.
pub async fn latest_by_patient(
    store: &dyn TableStore,
    patient_id: i64,
) -> Result<RequisitionWithLab> {
    let records = store.fetch_all(Table::Requisitions).await?;
    let mut forms: Vec<RequisitionForm> = typed_rows(Table::Requisitions, records)
        .into_iter()
        .filter(|f: &RequisitionForm| f.patient_id == Some(patient_id))
        .collect();
    forms.sort_by(|a, b| b.recency_key().cmp(&a.recency_key()));

    let form = forms.into_iter().next().ok_or_else(|| Error::NotFound {
        entity: Table::Requisitions.entity(),
        id: format!("latest for patient {patient_id}"),
    })?;
    join_lab(store, form).await
}

/// Partially update a requisition's clinical fields through the
/// reconciler.
pub async fn update(
    store: &dyn TableStore,
    id: &str,
    update: &RequisitionUpdate,
) -> Result<RequisitionForm> {
    let candidates = match serde_json::to_value(update)? {
        Value::Object(map) => map,
        _ => unreachable!("updates serialize as objects"),
    };
    let record = reconcile::reconcile(store, Table::Requisitions, id, candidates).await?;
    Ok(serde_json::from_value(record)?)
}

/// Assign the lab foreign key. This is the only operation allowed to
/// change it once a creation workflow has set or nulled it.
pub async fn assign_lab(store: &dyn TableStore, id: &str, lab_id: i64) -> Result<RequisitionForm> {
    let mut candidates = serde_json::Map::new();
    candidates.insert("lab_id".into(), Value::from(lab_id));
    let record = reconcile::reconcile(store, Table::Requisitions, id, candidates).await?;
    info!(requisition_id = %id, lab_id, "Lab assigned");
    Ok(serde_json::from_value(record)?)
}

/// Simulate faxing a requisition to its assigned lab.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown requisition and
/// [`Error::Validation`] when no lab is assigned.
pub async fn fax(store: &dyn TableStore, id: &str) -> Result<String> {
    let form = get_form(store, id).await?;
    let lab_id = form
        .lab_id
        .ok_or_else(|| Error::Validation(format!("Requisition {id} has no associated lab_id.")))?;

    let patient = form
        .patient_id
        .map_or_else(|| "unknown".to_string(), |p| p.to_string());
    let message = format!(
        "Fax sent for patient (ID: {patient})'s requisition form (ID: {id}) to lab (ID: {lab_id})."
    );
    info!(requisition_id = %id, lab_id, "Fax simulated");
    Ok(message)
}

async fn join_lab(store: &dyn TableStore, form: RequisitionForm) -> Result<RequisitionWithLab> {
    let (lab_name, lab_address) = match form.lab_id {
        Some(id) => match facilities::find(store, FacilityKind::Lab, id).await? {
            Some(lab) => (lab.name.clone(), lab.plain_address()),
            None => (None, None),
        },
        None => (None, None),
    };
    Ok(RequisitionWithLab {
        requisition: form,
        lab_name,
        lab_address,
    })
}

/// Join a whole listing against one fetch of the lab table.
async fn join_labs(
    store: &dyn TableStore,
    forms: Vec<RequisitionForm>,
) -> Result<Vec<RequisitionWithLab>> {
    let labs = facilities::fetch(store, FacilityKind::Lab).await?;
    Ok(forms
        .into_iter()
        .map(|form| {
            let (lab_name, lab_address) = form
                .lab_id
                .and_then(|id| labs.iter().find(|l| l.facility_id == Some(id)))
                .map_or((None, None), |l| (l.name.clone(), l.plain_address()));
            RequisitionWithLab {
                requisition: form,
                lab_name,
                lab_address,
            }
        })
        .collect())
}
