//! Inference tool schemas and the typed designs they constrain.
//!
//! Each workflow makes exactly one inference call, forced onto one of
//! these schemas. The completion schemas list only the editable clinical
//! fields: the facility foreign keys are never part of any schema, which
//! is the first line of defense for the foreign-key invariant.

use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{
    Diagnosis, NewPrescription, NewRequisition, PrescriptionForm, RequisitionForm,
};
use crate::error::Result;
use crate::port::{InferenceRequest, ToolSchema};

/// Date stamp format used across the remote tables.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How long a generated prescription stays valid.
pub const PRESCRIPTION_VALIDITY_DAYS: i64 = 30;

const DESIGN_SYSTEM_PROMPT: &str = "You are a clinical order designer. Given a diagnosis, design \
     the medication order and the lab requisition a clinician would issue. You MUST answer by \
     calling the provided tool; never answer in natural language.";

const COMPLETE_SYSTEM_PROMPT: &str = "You are a clinical order assistant. Refine the given order \
     form so it is complete and consistent with the latest diagnosis. Only fill or correct \
     clinical fields; leave anything already correct alone. You MUST answer by calling the \
     provided tool; never answer in natural language.";

fn describe_diagnosis(diagnosis: &Diagnosis) -> String {
    format!(
        "Latest diagnosis (code: {}, date: {}): {}",
        diagnosis.diagnosis_code.as_deref().unwrap_or("n/a"),
        diagnosis.diagnosis_date.as_deref().unwrap_or("n/a"),
        diagnosis.diagnosis_description.as_deref().unwrap_or(""),
    )
}

/// Request for the generate-orders workflow: one call must design both
/// a complete prescription and a complete requisition.
#[must_use]
pub fn design_orders_request(diagnosis: &Diagnosis) -> InferenceRequest {
    InferenceRequest {
        system: DESIGN_SYSTEM_PROMPT.into(),
        user: describe_diagnosis(diagnosis),
        tool: ToolSchema {
            name: "design_orders",
            description: "Design one complete prescription and one complete lab requisition \
                          for the diagnosis.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "prescription": {
                        "type": "object",
                        "properties": {
                            "medication_name": {"type": "string"},
                            "medication_strength": {"type": "string"},
                            "medication_form": {"type": "string"},
                            "dosage_instructions": {"type": "string"},
                            "quantity": {"type": "integer"},
                            "refills_allowed": {"type": "integer"},
                            "status": {"type": "string"},
                            "notes": {"type": "string"}
                        },
                        "required": [
                            "medication_name", "medication_strength", "medication_form",
                            "dosage_instructions", "quantity", "refills_allowed"
                        ]
                    },
                    "requisition": {
                        "type": "object",
                        "properties": {
                            "department": {"type": "string"},
                            "test_type": {"type": "string"},
                            "test_code": {"type": "string"},
                            "clinical_info": {"type": "string"},
                            "priority": {"type": "string"},
                            "status": {"type": "string"},
                            "notes": {"type": "string"}
                        },
                        "required": ["test_type", "clinical_info", "priority"]
                    }
                },
                "required": ["prescription", "requisition"]
            }),
        },
    }
}

/// Request for the complete-prescription workflow. The schema carries the
/// editable clinical fields only.
pub fn complete_prescription_request(
    diagnosis: &Diagnosis,
    current: &PrescriptionForm,
) -> Result<InferenceRequest> {
    let user = format!(
        "{}\n\nCurrent prescription form:\n{}",
        describe_diagnosis(diagnosis),
        serde_json::to_string_pretty(current)?,
    );
    Ok(InferenceRequest {
        system: COMPLETE_SYSTEM_PROMPT.into(),
        user,
        tool: ToolSchema {
            name: "complete_prescription",
            description: "Fill in or correct the clinical fields of the prescription form.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "medication_name": {"type": "string"},
                    "medication_strength": {"type": "string"},
                    "medication_form": {"type": "string"},
                    "dosage_instructions": {"type": "string"},
                    "quantity": {"type": "integer"},
                    "refills_allowed": {"type": "integer"},
                    "expiry_date": {"type": "string"},
                    "status": {"type": "string"},
                    "notes": {"type": "string"}
                },
                "additionalProperties": false
            }),
        },
    })
}

/// Request for the complete-requisition workflow.
pub fn complete_requisition_request(
    diagnosis: &Diagnosis,
    current: &RequisitionForm,
) -> Result<InferenceRequest> {
    let user = format!(
        "{}\n\nCurrent requisition form:\n{}",
        describe_diagnosis(diagnosis),
        serde_json::to_string_pretty(current)?,
    );
    Ok(InferenceRequest {
        system: COMPLETE_SYSTEM_PROMPT.into(),
        user,
        tool: ToolSchema {
            name: "complete_requisition",
            description: "Fill in or correct the clinical fields of the requisition form.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "department": {"type": "string"},
                    "test_type": {"type": "string"},
                    "test_code": {"type": "string"},
                    "clinical_info": {"type": "string"},
                    "priority": {"type": "string"},
                    "result_date": {"type": "string"},
                    "status": {"type": "string"},
                    "notes": {"type": "string"}
                },
                "additionalProperties": false
            }),
        },
    })
}

/// The pair of designs a generate-orders inference call must produce.
#[derive(Debug, Deserialize)]
pub struct OrderDesigns {
    pub prescription: PrescriptionDesign,
    pub requisition: RequisitionDesign,
}

/// A complete prescription design from the inference service.
#[derive(Debug, Deserialize)]
pub struct PrescriptionDesign {
    pub medication_name: String,
    pub medication_strength: String,
    pub medication_form: String,
    pub dosage_instructions: String,
    pub quantity: i64,
    pub refills_allowed: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PrescriptionDesign {
    /// Turn the design into a creation payload: stamp dates, bind the
    /// patient, and deliberately leave the pharmacy unassigned.
    #[must_use]
    pub fn into_new(self, patient_id: i64, today: NaiveDate) -> NewPrescription {
        NewPrescription {
            patient_id,
            prescriber_id: None,
            medication_name: Some(self.medication_name),
            medication_strength: Some(self.medication_strength),
            medication_form: Some(self.medication_form),
            dosage_instructions: Some(self.dosage_instructions),
            quantity: Some(self.quantity),
            refills_allowed: Some(self.refills_allowed),
            date_prescribed: Some(today.format(DATE_FORMAT).to_string()),
            expiry_date: Some(
                (today + Duration::days(PRESCRIPTION_VALIDITY_DAYS))
                    .format(DATE_FORMAT)
                    .to_string(),
            ),
            status: self.status.or_else(|| Some("pending".into())),
            notes: self.notes,
            pharmacy_id: None,
        }
    }
}

/// A complete requisition design from the inference service.
#[derive(Debug, Deserialize)]
pub struct RequisitionDesign {
    #[serde(default)]
    pub department: Option<String>,
    pub test_type: String,
    #[serde(default)]
    pub test_code: Option<String>,
    pub clinical_info: String,
    pub priority: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RequisitionDesign {
    /// Turn the design into a creation payload: stamp the request date,
    /// bind the patient, and deliberately leave the lab unassigned.
    #[must_use]
    pub fn into_new(self, patient_id: i64, today: NaiveDate) -> NewRequisition {
        NewRequisition {
            patient_id,
            lab_id: None,
            department: self.department,
            test_type: Some(self.test_type),
            test_code: self.test_code,
            clinical_info: Some(self.clinical_info),
            date_requested: Some(today.format(DATE_FORMAT).to_string()),
            priority: Some(self.priority),
            status: self.status.or_else(|| Some("pending".into())),
            result_date: None,
            notes: self.notes,
        }
    }
}
