use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Once};
use tower::ServiceExt;

use alivia_api::api::create_application;
use alivia_api::api::handlers::{health, medication};
use alivia_api::api::routes::{create_router, AppState};
use alivia_api::config::AppConfig;
use alivia_domain::services::daily_record::DailyRecordService;
use alivia_domain::testing::{MockDailyRecordRepository, SubmissionGate};
use alivia_domain::{InMemoryKeyValueStorage, KeyValueStorage};

// Ensure tracing is initialized only once
static INIT: Once = Once::new();

fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .try_init();
    });
}

async fn create_test_app() -> Router {
    initialize();
    create_application(&AppConfig::default()).await.unwrap()
}

async fn create_seeded_app() -> Router {
    initialize();
    let config = AppConfig {
        seed_mock_data: true,
        ..AppConfig::default()
    };
    create_application(&config).await.unwrap()
}

/// App whose record persistence blocks until `gate` is released
fn create_gated_app(gate: SubmissionGate) -> Router {
    initialize();
    let storage: Arc<dyn KeyValueStorage> = Arc::new(InMemoryKeyValueStorage::new());
    let daily_records = Arc::new(DailyRecordService::new(MockDailyRecordRepository::gated(gate)));
    let state = AppState::new(daily_records, medication::create_service(storage.clone()));
    create_router(state, health::create_health_service(storage), "test")
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_with_headers(app, method, uri, body, &[]).await
}

async fn send_with_headers(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn daily_record_payload() -> Value {
    json!({
        "primaryPainArea": "back-lower",
        "secondaryPainAreas": ["neck"],
        "isUsualPlace": true,
        "painIntensity": 8.5,
        "painQualities": ["burning", "stabbing"],
        "painQualityOther": "",
        "durationUnit": "days",
        "durationValue": 2,
        "hasHadBefore": true,
        "weeklyFrequency": 3,
        "functionalImpactPhysical": 3,
        "functionalImpactWork": 5,
        "functionalImpactSocial": 2,
        "phq2Answer1": 1,
        "phq2Answer2": 1,
        "gad2Answer1": 0,
        "gad2Answer2": 1,
        "tookMedication": false,
        "medicationId": null,
        "medicationRelief": null,
        "recommendation": { "category": "autocuidado", "message": "stale" }
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "development");
    assert_eq!(body["components"]["storage"]["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_openapi_documentation_available() {
    let app = create_test_app().await;
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Alivia API");
    assert!(body["paths"]["/api/v1/wizard/sessions"].is_object());
}

#[tokio::test]
async fn test_create_daily_record_recomputes_recommendation() {
    let app = create_test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/patient/daily-records",
        Some(daily_record_payload()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_str().unwrap().starts_with("record-"));
    assert_eq!(body["recommendation"]["category"], "urgencia");
    assert_eq!(body["painAreas"], "[\"back-lower\",\"neck\"]");
    assert_eq!(body["painTypes"], "[\"burning\",\"stabbing\"]");
    assert_eq!(body["painDurationUnit"], "days");
    assert_eq!(body["painDurationValue"], 2);
    assert!(body["createdAt"].is_string());

    let id = body["id"].as_str().unwrap();
    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/api/v1/patient/daily-records/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], body["id"]);
    assert_eq!(fetched["primaryPainArea"], "back-lower");
}

#[tokio::test]
async fn test_idempotency_key_returns_the_same_record() {
    let app = create_test_app().await;
    let headers = [("Idempotency-Key", "3f1c2d9e-key")];

    let (first_status, first) = send_with_headers(
        &app,
        Method::POST,
        "/api/v1/patient/daily-records",
        Some(daily_record_payload()),
        &headers,
    )
    .await;
    let (_, second) = send_with_headers(
        &app,
        Method::POST,
        "/api/v1/patient/daily-records",
        Some(daily_record_payload()),
        &headers,
    )
    .await;

    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(first["id"], second["id"]);

    let (_, history) = send(&app, Method::GET, "/api/v1/patient/daily-records?range=all", None).await;
    assert_eq!(history["stats"]["totalRecords"], 1);
}

#[tokio::test]
async fn test_blank_idempotency_key_does_not_deduplicate() {
    let app = create_test_app().await;
    let headers = [("Idempotency-Key", " ")];

    let mut ids = Vec::new();
    for _ in 0..2 {
        let (status, body) = send_with_headers(
            &app,
            Method::POST,
            "/api/v1/patient/daily-records",
            Some(daily_record_payload()),
            &headers,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["id"].clone());
    }

    assert_ne!(ids[0], ids[1]);
    let (_, history) = send(&app, Method::GET, "/api/v1/patient/daily-records?range=all", None).await;
    assert_eq!(history["stats"]["totalRecords"], 2);
}

#[tokio::test]
async fn test_invalid_daily_record_is_rejected() {
    let app = create_test_app().await;
    let mut payload = daily_record_payload();
    payload["primaryPainArea"] = json!("");

    let (status, body) = send(&app, Method::POST, "/api/v1/patient/daily-records", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_unknown_daily_record_is_not_found() {
    let app = create_test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/patient/daily-records/record-missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_history_of_seeded_records() {
    let app = create_seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/patient/daily-records?range=all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"], "all");
    assert_eq!(body["stats"]["totalRecords"], 5);
    assert_eq!(body["records"].as_array().unwrap().len(), 5);
    assert_eq!(body["chart"].as_array().unwrap().len(), 5);

    let (status, body) = send(&app, Method::GET, "/api/v1/patient/daily-records", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"], "7days");
    assert_eq!(body["stats"]["totalRecords"], 0);

    let (status, body) = send(&app, Method::GET, "/api/v1/patient/daily-records?range=year", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_remote_recommendation() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/patient/pain-record/recommendation",
        Some(json!({ "painIntensity": 3.0, "functionalImpactPhysical": 7, "phq2Score": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "cesfam-ccr");
    assert_eq!(
        body["message"],
        "Se recomienda programar una consulta en CESFAM o CCR para evaluación y seguimiento."
    );

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/patient/pain-record/recommendation",
        Some(json!({})),
    )
    .await;
    assert_eq!(body["category"], "cesfam-ccr");
}

#[tokio::test]
async fn test_pain_scale_lookup() {
    let app = create_test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/patient/pain-scale?value=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["face"]["value"], 10);
    assert_eq!(body["color"], "rgb(220, 20, 60)");

    let (status, _) = send(&app, Method::GET, "/api/v1/patient/pain-scale", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, faces) = send(&app, Method::GET, "/api/v1/patient/pain-scale/faces", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(faces.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_medication_lifecycle() {
    let app = create_test_app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/v1/patient/medications",
        Some(json!({ "name": "Ibuprofeno", "type": "antiinflammatory", "dose": "400mg" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["frequency"], 8);
    assert!(created["nextDose"].is_string());
    assert!(created.get("lastTaken").is_none());
    let id = created["id"].as_str().unwrap().to_string();

    let (status, list) = send(&app, Method::GET, "/api/v1/patient/medications", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["timeUntilNextDose"]["status"], "due");

    let (status, taken) = send(
        &app,
        Method::POST,
        &format!("/api/v1/patient/medications/{}/take", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(taken["lastTaken"].is_string());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/patient/medications/{}", id),
        Some(json!({ "name": "Ibuprofeno", "type": "antiinflammatory", "dose": "600mg", "frequency": 12 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["dose"], "600mg");
    assert_eq!(updated["lastTaken"], taken["lastTaken"]);

    let uri = format!("/api/v1/patient/medications/{}", id);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_invalid_medication_is_rejected() {
    let app = create_test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/patient/medications",
        Some(json!({ "name": "", "dose": "400mg", "frequency": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_wizard_guard_blocks_location() {
    let app = create_test_app().await;
    let (status, session) = send(&app, Method::POST, "/api/v1/wizard/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["step"], "location");
    assert_eq!(session["stepNumber"], 1);
    assert_eq!(session["totalSteps"], 9);
    let id = session["sessionId"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/wizard/sessions/{}/continue", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "guard_failed");
    assert_eq!(body["details"]["missing"], json!(["primaryPainArea"]));
    assert_eq!(
        body["message"],
        "Por favor, selecciona al menos una zona principal donde sientes dolor"
    );
}

#[tokio::test]
async fn test_wizard_walkthrough_and_submit() {
    let app = create_test_app().await;
    let (_, session) = send(&app, Method::POST, "/api/v1/wizard/sessions", None).await;
    let id = session["sessionId"].as_str().unwrap().to_string();
    let base = format!("/api/v1/wizard/sessions/{}", id);

    for action in [
        json!({ "action": "toggleArea", "areaId": "neck" }),
        json!({ "action": "setIntensity", "value": 6.5 }),
        json!({ "action": "toggleQuality", "tag": "throbbing" }),
        json!({ "action": "answerPhq2", "question": 1, "value": 2 }),
        json!({ "action": "answerPhq2", "question": 2, "value": 1 }),
        json!({ "action": "answerGad2", "question": 1, "value": 0 }),
        json!({ "action": "answerGad2", "question": 2, "value": 1 }),
        json!({ "action": "setTookMedication", "value": false }),
    ] {
        let (status, _) = send(&app, Method::POST, &format!("{}/actions", base), Some(action)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, patched) = send(
        &app,
        Method::PATCH,
        &format!("{}/draft", base),
        Some(json!({ "isUsualPlace": true, "functionalImpactWork": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["draft"]["isUsualPlace"], true);
    assert_eq!(patched["draft"]["primaryPainArea"], "neck");

    let mut snapshot = patched;
    while snapshot["step"] != "save" {
        let (status, next) = send(&app, Method::POST, &format!("{}/continue", base), None).await;
        assert_eq!(status, StatusCode::OK, "continue failed at {}", snapshot["step"]);
        snapshot = next;
    }
    assert_eq!(snapshot["draft"]["recommendation"]["category"], "sapu-sar");

    let (status, body) = send(&app, Method::POST, &format!("{}/continue", base), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, record) = send(&app, Method::POST, &format!("{}/submit", base), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["primaryPainArea"], "neck");
    assert_eq!(record["painIntensity"], 6.5);
    assert_eq!(record["recommendation"]["category"], "sapu-sar");

    let (status, _) = send(&app, Method::GET, &base, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, dashboard) = send(&app, Method::GET, "/api/v1/patient/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["averagePain7Days"], 6.5);
    assert_eq!(dashboard["lastRecord"]["id"], record["id"]);
    assert_eq!(dashboard["emotional"]["status"], "Regular");
    assert_eq!(dashboard["emotional"]["phq2Positive"], true);
}

#[tokio::test]
async fn test_wizard_navigation_back_and_go_to() {
    let app = create_test_app().await;
    let (_, session) = send(&app, Method::POST, "/api/v1/wizard/sessions", None).await;
    let base = format!("/api/v1/wizard/sessions/{}", session["sessionId"].as_str().unwrap());

    let (status, snapshot) = send(&app, Method::POST, &format!("{}/back", base), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["step"], "location");

    send(
        &app,
        Method::POST,
        &format!("{}/actions", base),
        Some(json!({ "action": "toggleArea", "areaId": "head" })),
    )
    .await;
    send(&app, Method::POST, &format!("{}/continue", base), None).await;
    let (_, snapshot) = send(&app, Method::POST, &format!("{}/continue", base), None).await;
    assert_eq!(snapshot["step"], "quality");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("{}/go-to", base),
        Some(json!({ "step": "save" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, snapshot) = send(
        &app,
        Method::POST,
        &format!("{}/go-to", base),
        Some(json!({ "step": "location" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["step"], "location");
    assert_eq!(snapshot["draft"]["primaryPainArea"], "head");
}

#[tokio::test]
async fn test_wizard_rejects_dependent_action_without_parent_answer() {
    let app = create_test_app().await;
    let (_, session) = send(&app, Method::POST, "/api/v1/wizard/sessions", None).await;
    let base = format!("/api/v1/wizard/sessions/{}", session["sessionId"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("{}/actions", base),
        Some(json!({ "action": "setWeeklyFrequency", "value": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_abandon_discards_the_session() {
    let app = create_test_app().await;
    let (_, session) = send(&app, Method::POST, "/api/v1/wizard/sessions", None).await;
    let base = format!("/api/v1/wizard/sessions/{}", session["sessionId"].as_str().unwrap());

    let (status, _) = send(&app, Method::DELETE, &base, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::DELETE, &base, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_wizard_rejects_changes_while_submission_is_pending() {
    let gate = SubmissionGate::new();
    let app = create_gated_app(gate.clone());
    let (_, session) = send(&app, Method::POST, "/api/v1/wizard/sessions", None).await;
    let base = format!("/api/v1/wizard/sessions/{}", session["sessionId"].as_str().unwrap());

    for action in [
        json!({ "action": "toggleArea", "areaId": "knee-left" }),
        json!({ "action": "setIntensity", "value": 3.0 }),
        json!({ "action": "answerPhq2", "question": 1, "value": 0 }),
        json!({ "action": "answerPhq2", "question": 2, "value": 0 }),
        json!({ "action": "answerGad2", "question": 1, "value": 0 }),
        json!({ "action": "answerGad2", "question": 2, "value": 0 }),
        json!({ "action": "setTookMedication", "value": false }),
    ] {
        let (status, _) = send(&app, Method::POST, &format!("{}/actions", base), Some(action)).await;
        assert_eq!(status, StatusCode::OK);
    }
    loop {
        let (status, snapshot) = send(&app, Method::POST, &format!("{}/continue", base), None).await;
        assert_eq!(status, StatusCode::OK);
        if snapshot["step"] == "save" {
            break;
        }
    }

    let submitting = tokio::spawn({
        let app = app.clone();
        let uri = format!("{}/submit", base);
        async move { send(&app, Method::POST, &uri, None).await }
    });
    gate.wait_until_entered().await;

    let (status, snapshot) = send(&app, Method::GET, &base, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["submissionPending"], true);

    for (method, uri, body) in [
        (Method::POST, format!("{}/continue", base), None),
        (Method::POST, format!("{}/back", base), None),
        (Method::PATCH, format!("{}/draft", base), Some(json!({ "isUsualPlace": true }))),
        (Method::POST, format!("{}/submit", base), None),
        (Method::DELETE, base.clone(), None),
    ] {
        let (status, body) = send(&app, method.clone(), &uri, body).await;
        assert_eq!(status, StatusCode::CONFLICT, "{} {}", method, uri);
        assert_eq!(body["error"], "submission_pending");
    }

    gate.release();
    let (status, record) = submitting.await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["primaryPainArea"], "knee-left");
    assert_eq!(record["recommendation"]["category"], "autocuidado");

    let (status, _) = send(&app, Method::GET, &base, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
