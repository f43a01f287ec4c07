//! Diagnosis records and latest-diagnosis selection.

use serde::{Deserialize, Serialize};

use super::serde_ext::opt_lenient_i64;

/// Payload for recording a diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDiagnosis {
    pub patient_id: i64,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub diagnosis_code: Option<String>,
    #[serde(default)]
    pub diagnosis_description: Option<String>,
    /// Sortable date string, `YYYY-MM-DD`.
    #[serde(default)]
    pub diagnosis_date: Option<String>,
}

/// A diagnosis row as held by the remote store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnosis {
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub diagnosis_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub patient_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub diagnosis_code: Option<String>,
    #[serde(default)]
    pub diagnosis_description: Option<String>,
    #[serde(default)]
    pub diagnosis_date: Option<String>,
}

impl Diagnosis {
    /// Ordering key for "latest": date first, numeric id as tie-break.
    /// Missing parts sort lowest, matching the store's legacy rows.
    #[must_use]
    pub fn recency_key(&self) -> (String, i64) {
        (
            self.diagnosis_date.clone().unwrap_or_default(),
            self.diagnosis_id.unwrap_or(0),
        )
    }

    /// Whether the description carries any text to reason from.
    #[must_use]
    pub fn has_description(&self) -> bool {
        self.diagnosis_description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }
}

/// Select the most recent diagnosis by `(diagnosis_date, diagnosis_id)`
/// descending. The sort is stable, so among fully tied rows the first
/// encountered wins.
#[must_use]
pub fn latest(mut records: Vec<Diagnosis>) -> Option<Diagnosis> {
    records.sort_by(|a, b| b.recency_key().cmp(&a.recency_key()));
    records.into_iter().next()
}
