//! Store-agnostic domain types and pure logic.

mod diagnosis;
mod facility;
mod patient;
mod preference;
mod prescription;
mod requisition;
mod serde_ext;
mod table;

pub mod geo;
pub mod record;

// Core entity types
pub use diagnosis::{latest as latest_diagnosis, Diagnosis, NewDiagnosis};
pub use facility::{Facility, FacilityKind, NearbyFacility, NewFacility};
pub use patient::{NewPatient, Patient};
pub use preference::{NewPreference, Preference, PreferenceKind};
pub use prescription::{
    NewPrescription, PrescriptionForm, PrescriptionUpdate, PrescriptionWithPharmacy,
};
pub use requisition::{NewRequisition, RequisitionForm, RequisitionUpdate, RequisitionWithLab};
pub use table::Table;

// Geospatial enrichment
pub use geo::Coordinates;
