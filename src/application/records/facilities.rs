//! Facility registration pass-through and proximity ranking.
//!
//! Registration itself has no business logic; create and the plain reads
//! forward to the store. The value of this module is the read side:
//! joins, preference enrichment, and the nearest-facility queries.

use crate::domain::{geo, record, Facility, FacilityKind, NearbyFacility, NewFacility, Table};
use crate::error::{Error, Result};
use crate::port::TableStore;

use super::{page, patients, typed_rows, unwrap_created};

/// Default result count for nearest-facility queries.
pub const NEAREST_LIMIT: usize = 5;

/// Register a facility. The store assigns its identifier.
pub async fn create(
    store: &dyn TableStore,
    kind: FacilityKind,
    new: &NewFacility,
) -> Result<Facility> {
    let payload = serde_json::to_value(new)?;
    let response = store.create(kind.table(), &payload).await?;
    Ok(serde_json::from_value(unwrap_created(response))?)
}

/// List facilities of one kind with client-side pagination.
pub async fn list(
    store: &dyn TableStore,
    kind: FacilityKind,
    skip: usize,
    limit: usize,
) -> Result<Vec<Facility>> {
    Ok(page(fetch(store, kind).await?, skip, limit))
}

/// Fetch one facility by id.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when no record matches.
pub async fn get(store: &dyn TableStore, kind: FacilityKind, id: i64) -> Result<Facility> {
    find(store, kind, id).await?.ok_or_else(|| Error::NotFound {
        entity: kind.table().entity(),
        id: id.to_string(),
    })
}

/// All registered facilities of one kind, leniently typed.
pub(crate) async fn fetch(store: &dyn TableStore, kind: FacilityKind) -> Result<Vec<Facility>> {
    let records = store.fetch_all(kind.table()).await?;
    Ok(typed_rows(kind.table(), records))
}

/// One facility by id, or `None` when unregistered.
pub(crate) async fn find(
    store: &dyn TableStore,
    kind: FacilityKind,
    id: i64,
) -> Result<Option<Facility>> {
    let records = store.fetch_all(kind.table()).await?;
    Ok(
        record::find_by_id(&records, kind.table().id_field(), &id.to_string())
            .cloned()
            .and_then(|r| serde_json::from_value(r).ok()),
    )
}

/// The facilities nearest to a patient's contact address.
///
/// Facilities without valid embedded coordinates are excluded; results
/// come back nearest-first with distances rounded to two decimals. A
/// patient whose address carries no valid coordinates gets an empty
/// ranking: proximity is an enrichment, not a requirement.
///
/// # Errors
///
/// Returns [`Error::NotFound`](crate::error::Error::NotFound) when the
/// patient does not exist.
pub async fn nearest(
    store: &dyn TableStore,
    kind: FacilityKind,
    patient_id: i64,
    limit: usize,
) -> Result<Vec<NearbyFacility>> {
    let patient = patients::get(store, patient_id).await?;
    let Some(origin) = patient.coordinates() else {
        return Ok(Vec::new());
    };

    let candidates = fetch(store, kind)
        .await?
        .into_iter()
        .map(|facility| {
            let coords = facility.coordinates();
            (facility, coords)
        })
        .collect();

    Ok(geo::rank_nearest(origin, candidates, limit)
        .into_iter()
        .map(|(facility, distance_km)| NearbyFacility {
            plain_address: facility.plain_address(),
            facility,
            distance_km,
        })
        .collect())
}
