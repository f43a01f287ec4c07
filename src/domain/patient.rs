//! Patient records.

use serde::{Deserialize, Serialize};

use super::geo::{split_composite, Coordinates};
use super::serde_ext::opt_lenient_i64;

/// Payload for registering a patient. Serialized in full, nulls included,
/// so the remote row carries every column explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    /// Composite address: `"<plain>||<json {lat,lng}>"`, coordinates optional.
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, rename = "OHIP_code")]
    pub ohip_code: Option<String>,
    #[serde(default)]
    pub private_insurance_name: Option<String>,
    #[serde(default)]
    pub private_insurance_id: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<String>,
    #[serde(default)]
    pub height_cm: Option<String>,
    #[serde(default)]
    pub family_doctor_id: Option<String>,
}

/// A patient row as held by the remote store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Patient {
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, rename = "OHIP_code")]
    pub ohip_code: Option<String>,
    #[serde(default)]
    pub private_insurance_name: Option<String>,
    #[serde(default)]
    pub private_insurance_id: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<String>,
    #[serde(default)]
    pub height_cm: Option<String>,
    #[serde(default)]
    pub family_doctor_id: Option<String>,
}

impl Patient {
    /// Coordinates embedded in the contact address, when present and valid.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.contact_info
            .as_deref()
            .and_then(|addr| split_composite(addr).1)
    }

    /// The human-readable half of the contact address.
    #[must_use]
    pub fn plain_address(&self) -> Option<String> {
        self.contact_info
            .as_deref()
            .map(|addr| split_composite(addr).0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_lenient_ids_and_renamed_fields() {
        let patient: Patient = serde_json::from_value(json!({
            "patient_id": "3",
            "name": "Ada Lovelace",
            "OHIP_code": "1234-567-890",
        }))
        .unwrap();
        assert_eq!(patient.patient_id, Some(3));
        assert_eq!(patient.ohip_code.as_deref(), Some("1234-567-890"));
    }

    #[test]
    fn coordinates_come_from_contact_info() {
        let patient = Patient {
            contact_info: Some("10 Main St||{\"lat\":43.7,\"lng\":-79.4}".into()),
            ..Patient::default()
        };
        let coords = patient.coordinates().unwrap();
        assert_eq!(coords.lat, 43.7);
        assert_eq!(patient.plain_address().unwrap(), "10 Main St");
    }

    #[test]
    fn missing_contact_info_means_no_coordinates() {
        assert!(Patient::default().coordinates().is_none());
        assert!(Patient::default().plain_address().is_none());
    }
}
