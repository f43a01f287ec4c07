//! End-to-end workflow scenarios driven through tool dispatch, the same
//! path the routing shell uses.

mod support;

use serde_json::json;

use medrelay::domain::Table;
use medrelay::error::Error;
use medrelay::testkit::ScriptedInference;

use support::{clinic_store, orders_response, registry};

#[tokio::test]
async fn generate_orders_creates_both_forms_with_null_foreign_keys() {
    let store = clinic_store();
    let inference = ScriptedInference::new().with_response(orders_response());
    let registry = registry(store.clone(), inference);

    let result = registry
        .dispatch(
            "generate_orders_from_latest_diagnosis",
            json!({"patient_id": 1}),
        )
        .await
        .unwrap();

    // The newest diagnosis was selected.
    assert_eq!(result["diagnosis"]["diagnosis_id"], 2);

    // Both records persisted with sequence ids and null foreign keys.
    assert_eq!(result["prescription"]["prescription_id"], "1");
    assert_eq!(result["prescription"]["pharmacy_id"], serde_json::Value::Null);
    assert_eq!(result["requisition"]["requisition_id"], "1");
    assert_eq!(result["requisition"]["lab_id"], serde_json::Value::Null);

    // Creation stamps: prescribed today, expiry 30 days out, requested today.
    let prescribed = result["prescription"]["date_prescribed"].as_str().unwrap();
    let expiry = result["prescription"]["expiry_date"].as_str().unwrap();
    assert!(prescribed < expiry);
    assert_eq!(
        result["requisition"]["date_requested"].as_str().unwrap(),
        prescribed
    );

    assert_eq!(store.records(Table::Prescriptions).len(), 1);
    assert_eq!(store.records(Table::Requisitions).len(), 1);
}

#[tokio::test]
async fn generate_orders_sends_the_diagnosis_to_inference() {
    let store = clinic_store();
    let inference = std::sync::Arc::new(ScriptedInference::new().with_response(orders_response()));
    let workflows =
        medrelay::application::WorkflowOrchestrator::new(store.clone(), inference.clone());

    workflows.generate_orders(1).await.unwrap();

    let requests = inference.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].tool.name, "design_orders");
    // The prompt is built from the freshly selected latest diagnosis.
    assert!(requests[0].user.contains("acute sinusitis"));
    assert!(!requests[0].user.contains("seasonal allergies"));
}

#[tokio::test]
async fn generate_orders_allocates_increasing_sequence_ids() {
    let store = clinic_store();
    let inference = ScriptedInference::new()
        .with_response(orders_response())
        .with_response(orders_response());
    let registry = registry(store.clone(), inference);

    let first = registry
        .dispatch(
            "generate_orders_from_latest_diagnosis",
            json!({"patient_id": 1}),
        )
        .await
        .unwrap();
    let second = registry
        .dispatch(
            "generate_orders_from_latest_diagnosis",
            json!({"patient_id": 1}),
        )
        .await
        .unwrap();

    assert_eq!(first["prescription"]["prescription_id"], "1");
    assert_eq!(second["prescription"]["prescription_id"], "2");
}

#[tokio::test]
async fn patient_without_diagnoses_fails_with_zero_writes() {
    let store = clinic_store();
    let inference = ScriptedInference::new().with_response(orders_response());
    let registry = registry(store.clone(), inference);

    let err = registry
        .dispatch(
            "generate_orders_from_latest_diagnosis",
            json!({"patient_id": 2}),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoDiagnosis { patient_id: 2 }));
    assert_eq!(store.create_calls(), 0);
    assert_eq!(store.update_calls(), 0);
}

#[tokio::test]
async fn inference_returning_nothing_is_a_contract_violation() {
    let store = clinic_store();
    let registry = registry(store.clone(), ScriptedInference::new());

    let err = registry
        .dispatch(
            "generate_orders_from_latest_diagnosis",
            json!({"patient_id": 1}),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InferenceContract(_)));
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn completion_keeps_the_assigned_pharmacy() {
    let store = clinic_store();
    store.seed(
        Table::Prescriptions,
        vec![json!({"prescription_id": "11", "patient_id": 1,
                    "medication_name": "amoxicillin", "status": "draft",
                    "pharmacy_id": 7})],
    );
    // Inference tries to blank the (disallowed) foreign key.
    let inference = ScriptedInference::new()
        .with_response(json!({"pharmacy_id": "", "status": "pending"}));
    let registry = registry(store.clone(), inference);

    let result = registry
        .dispatch(
            "complete_prescription_from_diagnosis",
            json!({"patient_id": 1, "prescription_id": "11"}),
        )
        .await
        .unwrap();

    assert_eq!(result["pharmacy_id"], 7);
    assert_eq!(result["status"], "pending");
    assert_eq!(store.records(Table::Prescriptions)[0]["pharmacy_id"], 7);
}

#[tokio::test]
async fn completion_of_missing_order_is_not_found() {
    let store = clinic_store();
    let inference = ScriptedInference::new().with_response(json!({"status": "pending"}));
    let registry = registry(store.clone(), inference);

    let err = registry
        .dispatch(
            "complete_prescription_from_diagnosis",
            json!({"patient_id": 1, "prescription_id": "404"}),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(store.update_calls(), 0);
}

#[tokio::test]
async fn complete_requisition_round_trips_through_dispatch() {
    let store = clinic_store();
    store.seed(
        Table::Requisitions,
        vec![json!({"requisition_id": "20", "patient_id": 1,
                    "test_type": "CBC", "priority": "routine", "lab_id": 3})],
    );
    let inference = ScriptedInference::new()
        .with_response(json!({"priority": "urgent", "clinical_info": "worsening symptoms"}));
    let registry = registry(store.clone(), inference);

    let result = registry
        .dispatch(
            "complete_requisition_from_diagnosis",
            json!({"patient_id": 1, "requisition_id": "20"}),
        )
        .await
        .unwrap();

    assert_eq!(result["priority"], "urgent");
    assert_eq!(result["lab_id"], 3);
}

#[tokio::test]
async fn unknown_tool_is_a_typed_dispatch_error() {
    let registry = registry(clinic_store(), ScriptedInference::new());

    let err = registry
        .dispatch("no_such_tool", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnknownTool { name } if name == "no_such_tool"));
}
