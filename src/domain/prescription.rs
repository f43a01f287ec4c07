//! Prescription order forms.

use serde::{Deserialize, Serialize};

use super::serde_ext::{opt_lenient_i64, opt_lenient_string};

/// Payload for creating a prescription. The identifier is never part of
/// this struct: it is allocated server-side against the remote table.
/// Serialized in full so deliberately-null fields (notably `pharmacy_id`)
/// land explicitly in the stored row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPrescription {
    pub patient_id: i64,
    #[serde(default)]
    pub prescriber_id: Option<String>,
    #[serde(default)]
    pub medication_name: Option<String>,
    #[serde(default)]
    pub medication_strength: Option<String>,
    #[serde(default)]
    pub medication_form: Option<String>,
    #[serde(default)]
    pub dosage_instructions: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub refills_allowed: Option<i64>,
    #[serde(default)]
    pub date_prescribed: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub pharmacy_id: Option<i64>,
}

/// A prescription row as held by the remote store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrescriptionForm {
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub prescription_id: Option<String>,
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub prescriber_id: Option<String>,
    #[serde(default)]
    pub medication_name: Option<String>,
    #[serde(default)]
    pub medication_strength: Option<String>,
    #[serde(default)]
    pub medication_form: Option<String>,
    #[serde(default)]
    pub dosage_instructions: Option<String>,
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub refills_allowed: Option<i64>,
    #[serde(default)]
    pub date_prescribed: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub pharmacy_id: Option<i64>,
}

impl PrescriptionForm {
    /// Ordering key for "latest": prescribed date first, numeric id as
    /// tie-break.
    #[must_use]
    pub fn recency_key(&self) -> (String, i64) {
        (
            self.date_prescribed.clone().unwrap_or_default(),
            self.prescription_id
                .as_deref()
                .and_then(|id| id.trim().parse().ok())
                .unwrap_or(0),
        )
    }
}

/// Partial update for a prescription's clinical fields.
///
/// Only explicitly-set fields serialize; everything else stays out of the
/// diff the reconciler computes. The pharmacy foreign key is deliberately
/// not representable here: it changes only through the dedicated
/// assignment operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrescriptionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescriber_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_strength: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refills_allowed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_prescribed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A prescription joined with its pharmacy's display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionWithPharmacy {
    pub prescription: PrescriptionForm,
    pub pharmacy_name: Option<String>,
    /// Plain half of the pharmacy's composite address.
    pub pharmacy_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_numeric_id_rows() {
        let form: PrescriptionForm = serde_json::from_value(json!({
            "prescription_id": 17,
            "patient_id": "4",
            "quantity": "30",
        }))
        .unwrap();
        assert_eq!(form.prescription_id.as_deref(), Some("17"));
        assert_eq!(form.patient_id, Some(4));
        assert_eq!(form.quantity, Some(30));
    }

    #[test]
    fn update_serializes_only_set_fields() {
        let update = PrescriptionUpdate {
            status: Some("filled".into()),
            ..PrescriptionUpdate::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["status"], "filled");
    }

    #[test]
    fn new_prescription_serializes_nulls_explicitly() {
        let new = NewPrescription {
            patient_id: 1,
            ..NewPrescription::default()
        };
        let value = serde_json::to_value(&new).unwrap();
        assert!(value.get("pharmacy_id").unwrap().is_null());
        assert!(value.get("medication_name").unwrap().is_null());
    }

    #[test]
    fn recency_key_orders_by_date_then_numeric_id() {
        let older = PrescriptionForm {
            prescription_id: Some("9".into()),
            date_prescribed: Some("2026-01-01".into()),
            ..PrescriptionForm::default()
        };
        let newer = PrescriptionForm {
            prescription_id: Some("2".into()),
            date_prescribed: Some("2026-02-01".into()),
            ..PrescriptionForm::default()
        };
        assert!(newer.recency_key() > older.recency_key());
    }
}
