//! Pharmacy and lab registrations.
//!
//! Both facility tables share one shape apart from the identifier field
//! name, so a single record type covers them, tagged by [`FacilityKind`].

use serde::{Deserialize, Serialize};

use super::geo::{split_composite, Coordinates};
use super::preference::PreferenceKind;
use super::serde_ext::opt_lenient_i64;
use super::table::Table;

/// Which facility table a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityKind {
    Pharmacy,
    Lab,
}

impl FacilityKind {
    #[must_use]
    pub const fn table(self) -> Table {
        match self {
            FacilityKind::Pharmacy => Table::Pharmacies,
            FacilityKind::Lab => Table::Labs,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FacilityKind::Pharmacy => "pharmacy",
            FacilityKind::Lab => "lab",
        }
    }
}

impl From<PreferenceKind> for FacilityKind {
    fn from(kind: PreferenceKind) -> Self {
        match kind {
            PreferenceKind::Pharmacy => FacilityKind::Pharmacy,
            PreferenceKind::Lab => FacilityKind::Lab,
        }
    }
}

/// Payload for registering a facility in either table. The store assigns
/// the identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewFacility {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Composite address: `"<plain>||<json {lat,lng}>"`, coordinates optional.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub license_no: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub registered_on: Option<String>,
}

/// A facility row as held by either registration table.
///
/// The identifier deserializes from `pharmacy_id` or `lab_id`, whichever
/// the source table carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Facility {
    #[serde(
        default,
        alias = "pharmacy_id",
        alias = "lab_id",
        deserialize_with = "opt_lenient_i64"
    )]
    pub facility_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Composite address: `"<plain>||<json {lat,lng}>"`, coordinates optional.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub license_no: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub registered_on: Option<String>,
}

impl Facility {
    /// Coordinates embedded in the composite address, when valid.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.address.as_deref().and_then(|a| split_composite(a).1)
    }

    /// The human-readable half of the composite address.
    #[must_use]
    pub fn plain_address(&self) -> Option<String> {
        self.address.as_deref().map(|a| split_composite(a).0)
    }
}

/// A facility ranked by distance from a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyFacility {
    pub facility: Facility,
    pub plain_address: Option<String>,
    pub distance_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_deserializes_from_either_table_field() {
        let pharmacy: Facility =
            serde_json::from_value(json!({"pharmacy_id": 2, "name": "Corner Rx"})).unwrap();
        assert_eq!(pharmacy.facility_id, Some(2));

        let lab: Facility =
            serde_json::from_value(json!({"lab_id": "9", "name": "BioTest"})).unwrap();
        assert_eq!(lab.facility_id, Some(9));
    }

    #[test]
    fn address_halves_split_apart() {
        let facility = Facility {
            address: Some("5 King St W||{\"lat\":43.64,\"lng\":-79.38}".into()),
            ..Facility::default()
        };
        assert_eq!(facility.plain_address().unwrap(), "5 King St W");
        assert!(facility.coordinates().is_some());
    }

    #[test]
    fn kind_maps_to_table() {
        assert_eq!(FacilityKind::Pharmacy.table(), Table::Pharmacies);
        assert_eq!(FacilityKind::Lab.table(), Table::Labs);
    }
}
