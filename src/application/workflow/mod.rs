//! Workflow orchestration.
//!
//! Two workflow shapes, both chaining remote reads, exactly one inference
//! call, and remote writes against a store that offers no transactions:
//!
//! - **generate orders**: design and persist a prescription plus a
//!   requisition from the patient's latest diagnosis;
//! - **complete order**: refine an existing prescription or requisition
//!   from the latest diagnosis, preserving its facility foreign key.
//!
//! A mid-chain failure aborts the remaining steps and leaves earlier
//! writes in place; there is deliberately no compensation (see DESIGN.md).

pub mod schema;
pub mod tools;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::application::records::{diagnoses, prescriptions, requisitions};
use crate::application::reconcile;
use crate::domain::{
    Diagnosis, PrescriptionForm, PrescriptionUpdate, RequisitionForm, RequisitionUpdate, Table,
};
use crate::error::{Error, Result};
use crate::port::{StructuredInference, TableStore};

use schema::OrderDesigns;

/// Result of the generate-orders workflow.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedOrders {
    pub patient_id: i64,
    /// The diagnosis the designs were derived from.
    pub diagnosis: Diagnosis,
    pub prescription: PrescriptionForm,
    pub requisition: RequisitionForm,
}

/// Composes store reads, one inference call, and store writes into the
/// workflow operations.
pub struct WorkflowOrchestrator {
    store: Arc<dyn TableStore>,
    inference: Arc<dyn StructuredInference>,
}

impl WorkflowOrchestrator {
    #[must_use]
    pub fn new(store: Arc<dyn TableStore>, inference: Arc<dyn StructuredInference>) -> Self {
        Self { store, inference }
    }

    /// The latest diagnosis a workflow may reason from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDiagnosis`] when the patient has no diagnosis
    /// at all, or the selected one has an empty description.
    async fn usable_diagnosis(&self, patient_id: i64) -> Result<Diagnosis> {
        match diagnoses::latest_by_patient(self.store.as_ref(), patient_id).await? {
            Some(diagnosis) if diagnosis.has_description() => Ok(diagnosis),
            _ => Err(Error::NoDiagnosis { patient_id }),
        }
    }

    /// Generate and persist both order forms from the latest diagnosis.
    ///
    /// The inference designs carry clinical content only; this layer
    /// binds the patient, stamps the dates, and leaves both facility
    /// foreign keys null for the later explicit assignment step. The
    /// prescription is created first; if the requisition then fails, the
    /// prescription stays persisted.
    pub async fn generate_orders(&self, patient_id: i64) -> Result<GeneratedOrders> {
        let diagnosis = self.usable_diagnosis(patient_id).await?;

        let request = schema::design_orders_request(&diagnosis);
        let args = self.inference.invoke(&request).await?;
        let designs: OrderDesigns = parse_inference(args, "order designs")?;

        let today = chrono::Utc::now().date_naive();
        let new_prescription = designs.prescription.into_new(patient_id, today);
        let new_requisition = designs.requisition.into_new(patient_id, today);

        let prescription = prescriptions::create(self.store.as_ref(), &new_prescription).await?;
        let requisition = match requisitions::create(self.store.as_ref(), &new_requisition).await {
            Ok(requisition) => requisition,
            Err(err) => {
                warn!(
                    patient_id,
                    prescription_id = prescription.prescription_id.as_deref().unwrap_or(""),
                    "Requisition creation failed after prescription persisted; no compensation"
                );
                return Err(err);
            }
        };

        info!(
            patient_id,
            prescription_id = prescription.prescription_id.as_deref().unwrap_or(""),
            requisition_id = requisition.requisition_id.as_deref().unwrap_or(""),
            "Orders generated from latest diagnosis"
        );

        Ok(GeneratedOrders {
            patient_id,
            diagnosis,
            prescription,
            requisition,
        })
    }

    /// Refine an existing prescription from the latest diagnosis.
    ///
    /// The pharmacy foreign key is captured before the inference call and
    /// restored afterwards if the updated record no longer matches it -
    /// mandatory invariant enforcement, not best-effort.
    pub async fn complete_prescription(
        &self,
        patient_id: i64,
        prescription_id: &str,
    ) -> Result<PrescriptionForm> {
        let diagnosis = self.usable_diagnosis(patient_id).await?;
        let current = prescriptions::get_form(self.store.as_ref(), prescription_id).await?;
        let original_pharmacy = current.pharmacy_id;

        let request = schema::complete_prescription_request(&diagnosis, &current)?;
        let args = self.inference.invoke(&request).await?;
        let update: PrescriptionUpdate = parse_inference(args, "prescription completion")?;

        let updated =
            prescriptions::update(self.store.as_ref(), prescription_id, &update).await?;

        if updated.pharmacy_id != original_pharmacy {
            warn!(
                prescription_id,
                "Completion altered pharmacy_id; restoring captured value"
            );
            let record = restore_foreign_key(
                self.store.as_ref(),
                Table::Prescriptions,
                prescription_id,
                "pharmacy_id",
                original_pharmacy,
            )
            .await?;
            return Ok(serde_json::from_value(record)?);
        }

        Ok(updated)
    }

    /// Refine an existing requisition from the latest diagnosis, with the
    /// same foreign-key enforcement for `lab_id`.
    pub async fn complete_requisition(
        &self,
        patient_id: i64,
        requisition_id: &str,
    ) -> Result<RequisitionForm> {
        let diagnosis = self.usable_diagnosis(patient_id).await?;
        let current = requisitions::get_form(self.store.as_ref(), requisition_id).await?;
        let original_lab = current.lab_id;

        let request = schema::complete_requisition_request(&diagnosis, &current)?;
        let args = self.inference.invoke(&request).await?;
        let update: RequisitionUpdate = parse_inference(args, "requisition completion")?;

        let updated = requisitions::update(self.store.as_ref(), requisition_id, &update).await?;

        if updated.lab_id != original_lab {
            warn!(
                requisition_id,
                "Completion altered lab_id; restoring captured value"
            );
            let record = restore_foreign_key(
                self.store.as_ref(),
                Table::Requisitions,
                requisition_id,
                "lab_id",
                original_lab,
            )
            .await?;
            return Ok(serde_json::from_value(record)?);
        }

        Ok(updated)
    }
}

/// Parse inference arguments into the expected typed shape. A mismatch is
/// a contract violation, not a validation error: the schema was forced
/// on the service.
fn parse_inference<T: serde::de::DeserializeOwned>(args: Value, what: &str) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| Error::InferenceContract(format!("{what} did not match the schema: {e}")))
}

/// Write a captured foreign-key value back over whatever the update left
/// behind, and return the canonical record.
async fn restore_foreign_key(
    store: &dyn TableStore,
    table: Table,
    id: &str,
    field: &str,
    value: Option<i64>,
) -> Result<Value> {
    let mut candidates = serde_json::Map::new();
    candidates.insert(field.to_string(), value.map_or(Value::Null, Value::from));
    reconcile::reconcile(store, table, id, candidates).await
}
