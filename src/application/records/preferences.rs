//! Patient preference operations, including the enriched facility views.

use serde::{Deserialize, Serialize};

use crate::domain::{geo, Facility, NewPreference, Preference, PreferenceKind, Table};
use crate::error::Result;
use crate::port::TableStore;

use super::{facilities, page, patients, typed_rows, unwrap_created};

/// A preference reduced to its target facility id and note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceTarget {
    pub target_id: i64,
    pub notes: Option<String>,
}

/// A preferred facility enriched with distance from the patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferredFacility {
    pub facility: Facility,
    pub plain_address: Option<String>,
    /// Null when either side of the pair lacks valid coordinates.
    pub distance_km: Option<f64>,
    pub notes: Option<String>,
}

/// Record a preference. The exactly-one-target invariant is checked
/// before any remote call; invalid input never reaches the store.
pub async fn create(store: &dyn TableStore, new: &NewPreference) -> Result<Preference> {
    new.validate()?;
    let payload = serde_json::to_value(new)?;
    let response = store.create(Table::Preferences, &payload).await?;
    Ok(serde_json::from_value(unwrap_created(response))?)
}

/// List preferences with client-side pagination.
pub async fn list(store: &dyn TableStore, skip: usize, limit: usize) -> Result<Vec<Preference>> {
    let records = store.fetch_all(Table::Preferences).await?;
    Ok(page(typed_rows(Table::Preferences, records), skip, limit))
}

/// A patient's preferences of one kind.
pub async fn by_patient_and_kind(
    store: &dyn TableStore,
    patient_id: i64,
    kind: PreferenceKind,
) -> Result<Vec<Preference>> {
    let records = store.fetch_all(Table::Preferences).await?;
    let typed: Vec<Preference> = typed_rows(Table::Preferences, records);
    Ok(typed
        .into_iter()
        .filter(|p| {
            p.patient_id == Some(patient_id) && p.preference_type.as_deref() == Some(kind.as_str())
        })
        .collect())
}

/// The slim view: target facility id plus note, skipping rows whose
/// target id is missing.
pub async fn targets(
    store: &dyn TableStore,
    patient_id: i64,
    kind: PreferenceKind,
) -> Result<Vec<PreferenceTarget>> {
    let preferences = by_patient_and_kind(store, patient_id, kind).await?;
    Ok(preferences
        .into_iter()
        .filter_map(|p| {
            let target_id = p.target_id(kind)?;
            Some(PreferenceTarget {
                target_id,
                notes: p.notes,
            })
        })
        .collect())
}

/// The detailed view: each preferred facility with its plain address,
/// distance from the patient (null when coordinates are missing on
/// either side), and the preference's note. Preferences pointing at
/// unregistered facilities are skipped.
///
/// # Errors
///
/// Returns [`Error::NotFound`](crate::error::Error::NotFound) when the
/// patient does not exist.
pub async fn detailed(
    store: &dyn TableStore,
    patient_id: i64,
    kind: PreferenceKind,
) -> Result<Vec<PreferredFacility>> {
    let patient = patients::get(store, patient_id).await?;
    let origin = patient.coordinates();

    let preferences = by_patient_and_kind(store, patient_id, kind).await?;
    let registered = facilities::fetch(store, kind.into()).await?;

    let mut candidates = Vec::new();
    for preference in preferences {
        let Some(target_id) = preference.target_id(kind) else {
            continue;
        };
        let Some(facility) = registered
            .iter()
            .find(|f| f.facility_id == Some(target_id))
            .cloned()
        else {
            continue;
        };
        let coords = facility.coordinates();
        candidates.push(((facility, preference.notes), coords));
    }

    Ok(geo::with_distances(origin, candidates)
        .into_iter()
        .map(|((facility, notes), distance_km)| PreferredFacility {
            plain_address: facility.plain_address(),
            facility,
            distance_km,
            notes,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testkit::InMemoryStore;
    use serde_json::json;

    fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.seed(
            Table::Patients,
            vec![json!({"patient_id": 1, "name": "Ada",
                        "contact_info": "10 Main St||{\"lat\":43.70,\"lng\":-79.40}"})],
        );
        store.seed(
            Table::Preferences,
            vec![
                json!({"preference_id": 1, "patient_id": 1, "preference_type": "pharmacy",
                       "pharmacy_id": 2, "notes": "open late"}),
                json!({"preference_id": 2, "patient_id": 1, "preference_type": "lab",
                       "lab_id": 5}),
                json!({"preference_id": 3, "patient_id": 2, "preference_type": "pharmacy",
                       "pharmacy_id": 9}),
            ],
        );
        store.seed(
            Table::Pharmacies,
            vec![json!({"pharmacy_id": 2, "name": "Near Rx",
                        "address": "12 Main St||{\"lat\":43.71,\"lng\":-79.40}"})],
        );
        store
    }

    #[tokio::test]
    async fn create_validates_before_any_remote_call() {
        let store = InMemoryStore::new();
        let invalid = NewPreference {
            patient_id: 1,
            preference_type: PreferenceKind::Pharmacy,
            pharmacy_id: Some(2),
            lab_id: Some(3),
            notes: None,
        };

        let err = create(&store, &invalid).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.create_calls(), 0);
    }

    #[tokio::test]
    async fn create_persists_valid_preference() {
        let store = InMemoryStore::new();
        let valid = NewPreference {
            patient_id: 1,
            preference_type: PreferenceKind::Lab,
            pharmacy_id: None,
            lab_id: Some(3),
            notes: Some("morning draws".into()),
        };

        let preference = create(&store, &valid).await.unwrap();
        assert_eq!(preference.lab_id, Some(3));
        assert_eq!(store.create_calls(), 1);
    }

    #[tokio::test]
    async fn targets_filters_kind_and_missing_ids() {
        let store = seeded();
        let targets = targets(&store, 1, PreferenceKind::Pharmacy).await.unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].target_id, 2);
        assert_eq!(targets[0].notes.as_deref(), Some("open late"));
    }

    #[tokio::test]
    async fn detailed_attaches_distance_and_note() {
        let store = seeded();
        let detailed = detailed(&store, 1, PreferenceKind::Pharmacy).await.unwrap();
        assert_eq!(detailed.len(), 1);
        let entry = &detailed[0];
        assert_eq!(entry.facility.name.as_deref(), Some("Near Rx"));
        assert_eq!(entry.plain_address.as_deref(), Some("12 Main St"));
        assert!(entry.distance_km.unwrap() < 5.0);
        assert_eq!(entry.notes.as_deref(), Some("open late"));
    }

    #[tokio::test]
    async fn detailed_skips_unregistered_facilities() {
        let store = seeded();
        // Patient 1's lab preference points at lab 5, which is unregistered.
        let detailed = detailed(&store, 1, PreferenceKind::Lab).await.unwrap();
        assert!(detailed.is_empty());
    }
}
