//! Patient facility preferences.
//!
//! A preference points at exactly one facility: `preference_type` names
//! which kind, and the matching id field must be set while the other
//! stays empty. The invariant is enforced here, before any remote call.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::serde_ext::opt_lenient_i64;

/// Which kind of facility a preference targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceKind {
    Pharmacy,
    Lab,
}

impl PreferenceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PreferenceKind::Pharmacy => "pharmacy",
            PreferenceKind::Lab => "lab",
        }
    }
}

/// Payload for recording a preference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPreference {
    pub patient_id: i64,
    pub preference_type: PreferenceKind,
    #[serde(default)]
    pub pharmacy_id: Option<i64>,
    #[serde(default)]
    pub lab_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewPreference {
    /// Check the exactly-one-target invariant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the id matching
    /// `preference_type` is missing, or the other id is set.
    pub fn validate(&self) -> Result<()> {
        match self.preference_type {
            PreferenceKind::Pharmacy => {
                if self.pharmacy_id.is_none() {
                    return Err(Error::Validation(
                        "pharmacy_id is required when preference_type is 'pharmacy'".into(),
                    ));
                }
                if self.lab_id.is_some() {
                    return Err(Error::Validation(
                        "lab_id must be empty when preference_type is 'pharmacy'".into(),
                    ));
                }
            }
            PreferenceKind::Lab => {
                if self.lab_id.is_none() {
                    return Err(Error::Validation(
                        "lab_id is required when preference_type is 'lab'".into(),
                    ));
                }
                if self.pharmacy_id.is_some() {
                    return Err(Error::Validation(
                        "pharmacy_id must be empty when preference_type is 'lab'".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A preference row as held by the remote store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preference {
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub preference_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub preference_type: Option<String>,
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub pharmacy_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_lenient_i64")]
    pub lab_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Preference {
    /// The facility id this preference points at, per its type tag.
    #[must_use]
    pub fn target_id(&self, kind: PreferenceKind) -> Option<i64> {
        match kind {
            PreferenceKind::Pharmacy => self.pharmacy_id,
            PreferenceKind::Lab => self.lab_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pharmacy_pref() -> NewPreference {
        NewPreference {
            patient_id: 1,
            preference_type: PreferenceKind::Pharmacy,
            pharmacy_id: Some(2),
            lab_id: None,
            notes: None,
        }
    }

    #[test]
    fn valid_pharmacy_preference_passes() {
        assert!(pharmacy_pref().validate().is_ok());
    }

    #[test]
    fn pharmacy_preference_requires_pharmacy_id() {
        let mut pref = pharmacy_pref();
        pref.pharmacy_id = None;
        assert!(matches!(pref.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn pharmacy_preference_rejects_both_targets() {
        let mut pref = pharmacy_pref();
        pref.lab_id = Some(3);
        assert!(matches!(pref.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn lab_preference_rejects_pharmacy_target() {
        let pref = NewPreference {
            patient_id: 1,
            preference_type: PreferenceKind::Lab,
            pharmacy_id: Some(2),
            lab_id: Some(3),
            notes: None,
        };
        assert!(matches!(pref.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(PreferenceKind::Pharmacy).unwrap(),
            serde_json::json!("pharmacy")
        );
    }
}
