#![allow(dead_code)]

//! Shared fixtures for the integration tests: a small seeded clinic and
//! canned inference payloads.

use std::sync::Arc;

use serde_json::{json, Value};

use medrelay::application::{workflow, ToolRegistry};
use medrelay::domain::Table;
use medrelay::testkit::{InMemoryStore, ScriptedInference};

/// A store seeded with one located patient, a history of diagnoses, and
/// a handful of facilities around Toronto.
pub fn clinic_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());

    store.seed(
        Table::Patients,
        vec![
            json!({"patient_id": 1, "name": "Ada Lovelace",
                   "contact_info": "10 Main St||{\"lat\":43.70,\"lng\":-79.40}",
                   "phone_number": "416-555-0101"}),
            json!({"patient_id": 2, "name": "Grace Hopper",
                   "contact_info": "somewhere without coordinates"}),
        ],
    );

    store.seed(
        Table::Diagnoses,
        vec![
            json!({"diagnosis_id": 1, "patient_id": 1, "diagnosis_date": "2026-01-10",
                   "diagnosis_code": "J30.1", "diagnosis_description": "seasonal allergies"}),
            json!({"diagnosis_id": 2, "patient_id": 1, "diagnosis_date": "2026-08-01",
                   "diagnosis_code": "J01.90", "diagnosis_description": "acute sinusitis"}),
        ],
    );

    store.seed(
        Table::Pharmacies,
        vec![
            json!({"pharmacy_id": 2, "name": "Near Rx",
                   "address": "12 Main St||{\"lat\":43.71,\"lng\":-79.40}"}),
            json!({"pharmacy_id": 3, "name": "Far Rx",
                   "address": "99 North Rd||{\"lat\":44.50,\"lng\":-79.40}"}),
            json!({"pharmacy_id": 4, "name": "Mystery Rx", "address": "Unknown||not-json"}),
        ],
    );

    store.seed(
        Table::Labs,
        vec![json!({"lab_id": 3, "name": "BioTest",
                    "address": "40 College St||{\"lat\":43.66,\"lng\":-79.39}"})],
    );

    store
}

/// A complete design payload for the generate-orders inference call.
pub fn orders_response() -> Value {
    json!({
        "prescription": {
            "medication_name": "amoxicillin",
            "medication_strength": "500 mg",
            "medication_form": "capsule",
            "dosage_instructions": "1 capsule three times daily",
            "quantity": 21,
            "refills_allowed": 0,
            "notes": "complete the full course"
        },
        "requisition": {
            "department": "microbiology",
            "test_type": "sinus culture",
            "clinical_info": "recurrent acute sinusitis",
            "priority": "routine"
        }
    })
}

/// Build the default tool registry over the given fakes.
pub fn registry(store: Arc<InMemoryStore>, inference: ScriptedInference) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    workflow::tools::register_defaults(&mut registry, store, Arc::new(inference));
    registry
}
