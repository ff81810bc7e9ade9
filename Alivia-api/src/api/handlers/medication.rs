use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{info, instrument};

use alivia_domain::entities::{Medication, MedicationReminder, MedicationRequest};
use alivia_domain::services::{create_medication_service, MedicationServiceTrait};
use alivia_domain::KeyValueStorage;

use crate::entities::common::ErrorResponse;

/// Service type for dependency injection
pub type MedicationService = Arc<dyn MedicationServiceTrait + Send + Sync>;

/// Create a medication service persisting to `storage`
pub fn create_service(storage: Arc<dyn KeyValueStorage>) -> MedicationService {
    Arc::new(create_medication_service(storage))
}

/// List medications with the time left until each next dose
#[utoipa::path(
    get,
    path = "/api/v1/patient/medications",
    responses(
        (status = 200, description = "Medication reminders", body = [MedicationReminder]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "medications"
)]
#[instrument(skip(service))]
pub async fn list_medications(State(service): State<MedicationService>) -> Result<impl IntoResponse, Response> {
    let reminders = service
        .list_reminders(Utc::now())
        .await
        .map_err(|e| ErrorResponse::from(e).into_response())?;
    Ok((StatusCode::OK, Json(reminders)))
}

/// Add a medication; the first dose is due one interval from now
#[utoipa::path(
    post,
    path = "/api/v1/patient/medications",
    request_body = MedicationRequest,
    responses(
        (status = 201, description = "Medication added", body = Medication),
        (status = 400, description = "Invalid medication", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "medications"
)]
#[instrument(skip(service, request))]
pub async fn add_medication(
    State(service): State<MedicationService>,
    Json(request): Json<MedicationRequest>,
) -> Result<impl IntoResponse, Response> {
    let medication = service
        .add_medication(request, Utc::now())
        .await
        .map_err(|e| ErrorResponse::from(e).into_response())?;
    info!("Medication added with ID: {}", medication.id);
    Ok((StatusCode::CREATED, Json(medication)))
}

/// Edit a medication, keeping its dose times
#[utoipa::path(
    put,
    path = "/api/v1/patient/medications/{id}",
    request_body = MedicationRequest,
    params(
        ("id" = String, Path, description = "Medication ID")
    ),
    responses(
        (status = 200, description = "Medication updated", body = Medication),
        (status = 400, description = "Invalid medication", body = ErrorResponse),
        (status = 404, description = "Medication not found", body = ErrorResponse),
    ),
    tag = "medications"
)]
#[instrument(skip(service, request))]
pub async fn update_medication(
    State(service): State<MedicationService>,
    Path(id): Path<String>,
    Json(request): Json<MedicationRequest>,
) -> Result<impl IntoResponse, Response> {
    let medication = service
        .update_medication(&id, request)
        .await
        .map_err(|e| ErrorResponse::from(e).into_response())?;
    Ok((StatusCode::OK, Json(medication)))
}

/// Record a dose taken now
#[utoipa::path(
    post,
    path = "/api/v1/patient/medications/{id}/take",
    params(
        ("id" = String, Path, description = "Medication ID")
    ),
    responses(
        (status = 200, description = "Dose recorded, next dose rescheduled", body = Medication),
        (status = 404, description = "Medication not found", body = ErrorResponse),
    ),
    tag = "medications"
)]
#[instrument(skip(service))]
pub async fn take_medication(
    State(service): State<MedicationService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Response> {
    let medication = service
        .take_medication(&id, Utc::now())
        .await
        .map_err(|e| ErrorResponse::from(e).into_response())?;
    info!("Dose of {} taken, next at {:?}", medication.name, medication.next_dose);
    Ok((StatusCode::OK, Json(medication)))
}

/// Remove a medication
#[utoipa::path(
    delete,
    path = "/api/v1/patient/medications/{id}",
    params(
        ("id" = String, Path, description = "Medication ID")
    ),
    responses(
        (status = 204, description = "Medication removed"),
        (status = 404, description = "Medication not found", body = ErrorResponse),
    ),
    tag = "medications"
)]
#[instrument(skip(service))]
pub async fn remove_medication(
    State(service): State<MedicationService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Response> {
    service
        .remove_medication(&id)
        .await
        .map_err(|e| ErrorResponse::from(e).into_response())?;
    Ok(StatusCode::NO_CONTENT)
}
