//! Lab requisition order forms.

use serde::{Deserialize, Serialize};

use super::serde_ext::{opt_lenient_i64, opt_lenient_string};

/// Payload for creating a requisition. Serialized in full, like
/// [`NewPrescription`](super::prescription::NewPrescription), so a
/// deliberately-null `lab_id` lands explicitly in the stored row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRequisition {
    pub patient_id: i64,
    #[serde(default)]
    pub lab_id: Option<i64>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub test_type: Option<String>,
    #[serde(default)]
    pub test_code: Option<String>,
    #[serde(default)]
    pub clinical_info: Option<String>,
    #[serde(default)]
    pub date_requested: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A requisition row as held by the remote store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequisitionForm {
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub requisition_id: Option<String>,
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub patient_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub lab_id: Option<i64>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub test_type: Option<String>,
    #[serde(default)]
    pub test_code: Option<String>,
    #[serde(default)]
    pub clinical_info: Option<String>,
    #[serde(default)]
    pub date_requested: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RequisitionForm {
    /// Ordering key for "latest": requested date first, numeric id as
    /// tie-break.
    #[must_use]
    pub fn recency_key(&self) -> (String, i64) {
        (
            self.date_requested.clone().unwrap_or_default(),
            self.requisition_id
                .as_deref()
                .and_then(|id| id.trim().parse().ok())
                .unwrap_or(0),
        )
    }
}

/// Partial update for a requisition's clinical fields. The lab foreign key
/// is not representable here; it changes only through the dedicated
/// assignment operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequisitionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_requested: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A requisition joined with its lab's display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequisitionWithLab {
    pub requisition: RequisitionForm,
    pub lab_name: Option<String>,
    /// Plain half of the lab's composite address.
    pub lab_address: Option<String>,
}
