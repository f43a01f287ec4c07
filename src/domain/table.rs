//! Remote table directory.
//!
//! The store addresses every record collection by a fixed table name and
//! supports no filtering or sequences of its own, so the table's name and
//! its identifier field are the only schema knowledge this layer holds.

use std::fmt;

/// A named table on the remote record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Patients,
    Diagnoses,
    Preferences,
    Prescriptions,
    Requisitions,
    Pharmacies,
    Labs,
}

impl Table {
    /// Path segment under `{base_url}/table/`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Table::Patients => "patients_registration",
            Table::Diagnoses => "diagnosis",
            Table::Preferences => "patient_preference",
            Table::Prescriptions => "prescription_form",
            Table::Requisitions => "requisition_form",
            Table::Pharmacies => "pharmacy_registration",
            Table::Labs => "lab_registration",
        }
    }

    /// The table-specific identifier field. Records may also carry a
    /// generic `id`, which lookups accept as a fallback.
    #[must_use]
    pub const fn id_field(self) -> &'static str {
        match self {
            Table::Patients => "patient_id",
            Table::Diagnoses => "diagnosis_id",
            Table::Preferences => "preference_id",
            Table::Prescriptions => "prescription_id",
            Table::Requisitions => "requisition_id",
            Table::Pharmacies => "pharmacy_id",
            Table::Labs => "lab_id",
        }
    }

    /// Human-readable entity label for error reporting.
    #[must_use]
    pub const fn entity(self) -> &'static str {
        match self {
            Table::Patients => "patient",
            Table::Diagnoses => "diagnosis",
            Table::Preferences => "preference",
            Table::Prescriptions => "prescription",
            Table::Requisitions => "requisition",
            Table::Pharmacies => "pharmacy",
            Table::Labs => "lab",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_remote_paths() {
        assert_eq!(Table::Patients.name(), "patients_registration");
        assert_eq!(Table::Prescriptions.name(), "prescription_form");
        assert_eq!(Table::Labs.name(), "lab_registration");
    }

    #[test]
    fn id_fields_are_table_specific() {
        assert_eq!(Table::Diagnoses.id_field(), "diagnosis_id");
        assert_eq!(Table::Requisitions.id_field(), "requisition_id");
    }

    #[test]
    fn display_uses_remote_name() {
        assert_eq!(Table::Preferences.to_string(), "patient_preference");
    }
}
