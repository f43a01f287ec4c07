//! Dispatchable tools wrapping the workflow steps.
//!
//! Every tool takes one JSON argument object and returns one JSON value,
//! so the dispatch boundary stays a generic pass-through. Argument
//! objects are parsed into typed structs up front; a mismatch is a
//! validation error raised before any remote call.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::records::{prescriptions, requisitions};
use crate::application::registry::{Tool, ToolRegistry};
use crate::domain::{NewPrescription, NewRequisition};
use crate::error::{Error, Result};
use crate::port::{StructuredInference, TableStore};

use super::WorkflowOrchestrator;

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| Error::Validation(format!("invalid tool arguments: {e}")))
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

#[derive(Deserialize)]
struct PatientArgs {
    patient_id: i64,
}

#[derive(Deserialize)]
struct CompletePrescriptionArgs {
    patient_id: i64,
    prescription_id: String,
}

#[derive(Deserialize)]
struct CompleteRequisitionArgs {
    patient_id: i64,
    requisition_id: String,
}

#[derive(Deserialize)]
struct AssignPharmacyArgs {
    prescription_id: String,
    pharmacy_id: i64,
}

#[derive(Deserialize)]
struct AssignLabArgs {
    requisition_id: String,
    lab_id: i64,
}

#[derive(Deserialize)]
struct PrescriptionIdArgs {
    prescription_id: String,
}

#[derive(Deserialize)]
struct RequisitionIdArgs {
    requisition_id: String,
}

struct GenerateOrdersTool {
    workflows: Arc<WorkflowOrchestrator>,
}

#[async_trait]
impl Tool for GenerateOrdersTool {
    fn name(&self) -> &'static str {
        "generate_orders_from_latest_diagnosis"
    }

    fn description(&self) -> &'static str {
        "Design and persist a prescription and a requisition from the patient's latest diagnosis."
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let args: PatientArgs = parse_args(args)?;
        let orders = self.workflows.generate_orders(args.patient_id).await?;
        to_value(&orders)
    }
}

struct CompletePrescriptionTool {
    workflows: Arc<WorkflowOrchestrator>,
}

#[async_trait]
impl Tool for CompletePrescriptionTool {
    fn name(&self) -> &'static str {
        "complete_prescription_from_diagnosis"
    }

    fn description(&self) -> &'static str {
        "Refine an existing prescription from the latest diagnosis; the pharmacy stays unchanged."
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let args: CompletePrescriptionArgs = parse_args(args)?;
        let form = self
            .workflows
            .complete_prescription(args.patient_id, &args.prescription_id)
            .await?;
        to_value(&form)
    }
}

struct CompleteRequisitionTool {
    workflows: Arc<WorkflowOrchestrator>,
}

#[async_trait]
impl Tool for CompleteRequisitionTool {
    fn name(&self) -> &'static str {
        "complete_requisition_from_diagnosis"
    }

    fn description(&self) -> &'static str {
        "Refine an existing requisition from the latest diagnosis; the lab stays unchanged."
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let args: CompleteRequisitionArgs = parse_args(args)?;
        let form = self
            .workflows
            .complete_requisition(args.patient_id, &args.requisition_id)
            .await?;
        to_value(&form)
    }
}

struct CreatePrescriptionTool {
    store: Arc<dyn TableStore>,
}

#[async_trait]
impl Tool for CreatePrescriptionTool {
    fn name(&self) -> &'static str {
        "create_prescription"
    }

    fn description(&self) -> &'static str {
        "Create a prescription with a freshly allocated identifier."
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let new: NewPrescription = parse_args(args)?;
        let form = prescriptions::create(self.store.as_ref(), &new).await?;
        to_value(&form)
    }
}

struct CreateRequisitionTool {
    store: Arc<dyn TableStore>,
}

#[async_trait]
impl Tool for CreateRequisitionTool {
    fn name(&self) -> &'static str {
        "create_requisition"
    }

    fn description(&self) -> &'static str {
        "Create a requisition with a freshly allocated identifier."
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let new: NewRequisition = parse_args(args)?;
        let form = requisitions::create(self.store.as_ref(), &new).await?;
        to_value(&form)
    }
}

struct AssignPharmacyTool {
    store: Arc<dyn TableStore>,
}

#[async_trait]
impl Tool for AssignPharmacyTool {
    fn name(&self) -> &'static str {
        "assign_prescription_pharmacy"
    }

    fn description(&self) -> &'static str {
        "Set the pharmacy for an existing prescription."
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let args: AssignPharmacyArgs = parse_args(args)?;
        let form = prescriptions::assign_pharmacy(
            self.store.as_ref(),
            &args.prescription_id,
            args.pharmacy_id,
        )
        .await?;
        to_value(&form)
    }
}

struct AssignLabTool {
    store: Arc<dyn TableStore>,
}

#[async_trait]
impl Tool for AssignLabTool {
    fn name(&self) -> &'static str {
        "assign_requisition_lab"
    }

    fn description(&self) -> &'static str {
        "Set the lab for an existing requisition."
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let args: AssignLabArgs = parse_args(args)?;
        let form =
            requisitions::assign_lab(self.store.as_ref(), &args.requisition_id, args.lab_id)
                .await?;
        to_value(&form)
    }
}

struct FaxPrescriptionTool {
    store: Arc<dyn TableStore>,
}

#[async_trait]
impl Tool for FaxPrescriptionTool {
    fn name(&self) -> &'static str {
        "fax_prescription"
    }

    fn description(&self) -> &'static str {
        "Simulate faxing a prescription to its assigned pharmacy."
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let args: PrescriptionIdArgs = parse_args(args)?;
        let message = prescriptions::fax(self.store.as_ref(), &args.prescription_id).await?;
        Ok(Value::String(message))
    }
}

struct FaxRequisitionTool {
    store: Arc<dyn TableStore>,
}

#[async_trait]
impl Tool for FaxRequisitionTool {
    fn name(&self) -> &'static str {
        "fax_requisition"
    }

    fn description(&self) -> &'static str {
        "Simulate faxing a requisition to its assigned lab."
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let args: RequisitionIdArgs = parse_args(args)?;
        let message = requisitions::fax(self.store.as_ref(), &args.requisition_id).await?;
        Ok(Value::String(message))
    }
}

/// Register the standard tool set against the given ports.
///
/// Called once at process start; the resulting registry is passed by
/// reference to whatever boundary dispatches tools.
pub fn register_defaults(
    registry: &mut ToolRegistry,
    store: Arc<dyn TableStore>,
    inference: Arc<dyn StructuredInference>,
) {
    let workflows = Arc::new(WorkflowOrchestrator::new(store.clone(), inference));

    registry.register(Box::new(GenerateOrdersTool {
        workflows: workflows.clone(),
    }));
    registry.register(Box::new(CompletePrescriptionTool {
        workflows: workflows.clone(),
    }));
    registry.register(Box::new(CompleteRequisitionTool { workflows }));
    registry.register(Box::new(CreatePrescriptionTool {
        store: store.clone(),
    }));
    registry.register(Box::new(CreateRequisitionTool {
        store: store.clone(),
    }));
    registry.register(Box::new(AssignPharmacyTool {
        store: store.clone(),
    }));
    registry.register(Box::new(AssignLabTool {
        store: store.clone(),
    }));
    registry.register(Box::new(FaxPrescriptionTool {
        store: store.clone(),
    }));
    registry.register(Box::new(FaxRequisitionTool { store }));
}
