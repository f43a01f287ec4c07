//! Prescription form operations: sequence-allocated creation, joined
//! reads, reconciled updates, pharmacy assignment, and fax simulation.

use serde_json::Value;
use tracing::info;

use crate::application::{reconcile, sequence};
use crate::domain::{
    FacilityKind, NewPrescription, PrescriptionForm, PrescriptionUpdate,
    PrescriptionWithPharmacy, Table,
};
use crate::error::{Error, Result};
use crate::port::TableStore;

use super::{facilities, page, typed_rows};

/// Create a prescription with a freshly allocated identifier.
///
/// The identifier comes from scanning the current table (max + 1); the
/// returned record is the payload this layer constructed, not the store's
/// echo, since the store's create response shape is not guaranteed.
pub async fn create(store: &dyn TableStore, new: &NewPrescription) -> Result<PrescriptionForm> {
    let records = store.fetch_all(Table::Prescriptions).await?;
    let id = sequence::next_id(Table::Prescriptions.id_field(), &records);

    let mut payload = serde_json::to_value(new)?;
    payload[Table::Prescriptions.id_field()] = Value::String(id.clone());

    store.create(Table::Prescriptions, &payload).await?;
    info!(prescription_id = %id, patient_id = new.patient_id, "Prescription created");
    Ok(serde_json::from_value(payload)?)
}

/// Fetch one prescription row without the pharmacy join.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when no record matches.
pub async fn get_form(store: &dyn TableStore, id: &str) -> Result<PrescriptionForm> {
    let record = reconcile::fetch_record(store, Table::Prescriptions, id).await?;
    Ok(serde_json::from_value(record)?)
}

/// Fetch one prescription with its pharmacy's name and plain address.
pub async fn get(store: &dyn TableStore, id: &str) -> Result<PrescriptionWithPharmacy> {
    let form = get_form(store, id).await?;
    join_pharmacy(store, form).await
}

/// List prescriptions with the pharmacy join, paged client-side.
pub async fn list(
    store: &dyn TableStore,
    skip: usize,
    limit: usize,
) -> Result<Vec<PrescriptionWithPharmacy>> {
    let records = store.fetch_all(Table::Prescriptions).await?;
    let forms: Vec<PrescriptionForm> = page(typed_rows(Table::Prescriptions, records), skip, limit);
    join_pharmacies(store, forms).await
}

/// The patient's most recent prescription by `(date_prescribed, id)`
/// descending, with the pharmacy join.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the patient has none.
pub async fn latest_by_patient(
    store: &dyn TableStore,
    patient_id: i64,
) -> Result<PrescriptionWithPharmacy> {
    let records = store.fetch_all(Table::Prescriptions).await?;
    let mut forms: Vec<PrescriptionForm> = typed_rows(Table::Prescriptions, records)
        .into_iter()
        .filter(|f: &PrescriptionForm| f.patient_id == Some(patient_id))
        .collect();
    forms.sort_by(|a, b| b.recency_key().cmp(&a.recency_key()));

    let form = forms.into_iter().next().ok_or_else(|| Error::NotFound {
        entity: Table::Prescriptions.entity(),
        id: format!("latest for patient {patient_id}"),
    })?;
    join_pharmacy(store, form).await
}

/// Partially update a prescription's clinical fields through the
/// reconciler: only explicitly-set fields are considered, and no write
/// happens when nothing differs.
pub async fn update(
    store: &dyn TableStore,
    id: &str,
    update: &PrescriptionUpdate,
) -> Result<PrescriptionForm> {
    let candidates = match serde_json::to_value(update)? {
        Value::Object(map) => map,
        _ => unreachable!("updates serialize as objects"),
    };
    let record = reconcile::reconcile(store, Table::Prescriptions, id, candidates).await?;
    Ok(serde_json::from_value(record)?)
}

/// Assign the pharmacy foreign key. This is the only operation allowed
/// to change it once a creation workflow has set or nulled it.
pub async fn assign_pharmacy(
    store: &dyn TableStore,
    id: &str,
    pharmacy_id: i64,
) -> Result<PrescriptionForm> {
    let mut candidates = serde_json::Map::new();
    candidates.insert("pharmacy_id".into(), Value::from(pharmacy_id));
    let record = reconcile::reconcile(store, Table::Prescriptions, id, candidates).await?;
    info!(prescription_id = %id, pharmacy_id, "Pharmacy assigned");
    Ok(serde_json::from_value(record)?)
}

/// Simulate faxing a prescription to its assigned pharmacy.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown prescription and
/// [`Error::Validation`] when no pharmacy is assigned.
pub async fn fax(store: &dyn TableStore, id: &str) -> Result<String> {
    let form = get_form(store, id).await?;
    let pharmacy_id = form.pharmacy_id.ok_or_else(|| {
        Error::Validation(format!("Prescription {id} has no associated pharmacy_id."))
    })?;

    let patient = form
        .patient_id
        .map_or_else(|| "unknown".to_string(), |p| p.to_string());
    let message = format!(
        "Fax sent for patient (ID: {patient})'s prescription form (ID: {id}) to pharmacy (ID: {pharmacy_id})."
    );
    info!(prescription_id = %id, pharmacy_id, "Fax simulated");
    Ok(message)
}

async fn join_pharmacy(
    store: &dyn TableStore,
    form: PrescriptionForm,
) -> Result<PrescriptionWithPharmacy> {
    let (pharmacy_name, pharmacy_address) = match form.pharmacy_id {
        Some(id) => match facilities::find(store, FacilityKind::Pharmacy, id).await? {
            Some(pharmacy) => (pharmacy.name.clone(), pharmacy.plain_address()),
            None => (None, None),
        },
        None => (None, None),
    };
    Ok(PrescriptionWithPharmacy {
        prescription: form,
        pharmacy_name,
        pharmacy_address,
    })
}

/// Join a whole listing against one fetch of the pharmacy table.
async fn join_pharmacies(
    store: &dyn TableStore,
    forms: Vec<PrescriptionForm>,
) -> Result<Vec<PrescriptionWithPharmacy>> {
    let pharmacies = facilities::fetch(store, FacilityKind::Pharmacy).await?;
    Ok(forms
        .into_iter()
        .map(|form| {
            let (pharmacy_name, pharmacy_address) = form
                .pharmacy_id
                .and_then(|id| pharmacies.iter().find(|p| p.facility_id == Some(id)))
                .map_or((None, None), |p| (p.name.clone(), p.plain_address()));
            PrescriptionWithPharmacy {
                prescription: form,
                pharmacy_name,
                pharmacy_address,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::InMemoryStore;
    use serde_json::json;

    fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.seed(
            Table::Prescriptions,
            vec![
                json!({"prescription_id": "3", "patient_id": 1, "status": "pending",
                       "date_prescribed": "2026-01-10", "pharmacy_id": 2}),
                json!({"prescription_id": "7", "patient_id": 1, "status": "filled",
                       "date_prescribed": "2026-04-02", "pharmacy_id": null}),
            ],
        );
        store.seed(
            Table::Pharmacies,
            vec![json!({"pharmacy_id": 2, "name": "Corner Rx",
                        "address": "5 King St W||{\"lat\":43.64,\"lng\":-79.38}"})],
        );
        store
    }

    #[tokio::test]
    async fn create_allocates_next_sequence_id() {
        let store = seeded();
        let new = NewPrescription {
            patient_id: 1,
            medication_name: Some("amoxicillin".into()),
            ..NewPrescription::default()
        };

        let created = create(&store, &new).await.unwrap();
        assert_eq!(created.prescription_id.as_deref(), Some("8"));
        assert_eq!(store.records(Table::Prescriptions).len(), 3);
    }

    #[tokio::test]
    async fn create_on_empty_table_starts_at_one() {
        let store = InMemoryStore::new();
        let created = create(&store, &NewPrescription::default()).await.unwrap();
        assert_eq!(created.prescription_id.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn get_joins_pharmacy_name_and_plain_address() {
        let store = seeded();
        let joined = get(&store, "3").await.unwrap();
        assert_eq!(joined.pharmacy_name.as_deref(), Some("Corner Rx"));
        assert_eq!(joined.pharmacy_address.as_deref(), Some("5 King St W"));
    }

    #[tokio::test]
    async fn get_without_pharmacy_has_null_join_fields() {
        let store = seeded();
        let joined = get(&store, "7").await.unwrap();
        assert!(joined.pharmacy_name.is_none());
        assert!(joined.pharmacy_address.is_none());
    }

    #[tokio::test]
    async fn latest_by_patient_picks_newest_date() {
        let store = seeded();
        let latest = latest_by_patient(&store, 1).await.unwrap();
        assert_eq!(latest.prescription.prescription_id.as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn latest_for_patient_with_none_is_not_found() {
        let store = seeded();
        let err = latest_by_patient(&store, 99).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_with_identical_values_skips_the_write() {
        let store = seeded();
        let noop = PrescriptionUpdate {
            status: Some("filled".into()),
            ..PrescriptionUpdate::default()
        };

        let form = update(&store, "7", &noop).await.unwrap();
        assert_eq!(store.update_calls(), 0);
        assert_eq!(form.status.as_deref(), Some("filled"));
    }

    #[tokio::test]
    async fn update_writes_only_the_differing_field() {
        let store = seeded();
        let change = PrescriptionUpdate {
            status: Some("expired".into()),
            ..PrescriptionUpdate::default()
        };

        let form = update(&store, "7", &change).await.unwrap();
        assert_eq!(store.update_calls(), 1);
        assert_eq!(form.status.as_deref(), Some("expired"));
    }

    #[tokio::test]
    async fn assign_pharmacy_sets_the_foreign_key() {
        let store = seeded();
        let form = assign_pharmacy(&store, "7", 2).await.unwrap();
        assert_eq!(form.pharmacy_id, Some(2));
    }

    #[tokio::test]
    async fn fax_requires_an_assigned_pharmacy() {
        let store = seeded();

        let message = fax(&store, "3").await.unwrap();
        assert_eq!(
            message,
            "Fax sent for patient (ID: 1)'s prescription form (ID: 3) to pharmacy (ID: 2)."
        );

        let err = fax(&store, "7").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = fax(&store, "404").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
