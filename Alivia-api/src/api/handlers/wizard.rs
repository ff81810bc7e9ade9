use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};
use uuid::Uuid;

use alivia_domain::entities::DraftPatch;
use alivia_domain::wizard::{StepAction, WizardServiceTrait, WizardSnapshot};

use crate::entities::common::ErrorResponse;
use crate::entities::daily_record::PublicDailyRecord;
use crate::entities::wizard::GoToRequest;

/// Service type for dependency injection
pub type WizardService = Arc<dyn WizardServiceTrait + Send + Sync>;

fn error_response(err: alivia_domain::wizard::WizardError) -> Response {
    ErrorResponse::from(err).into_response()
}

/// Start a daily record wizard
#[utoipa::path(
    post,
    path = "/api/v1/wizard/sessions",
    responses(
        (status = 201, description = "Session created at the location step", body = WizardSnapshot),
    ),
    tag = "wizard"
)]
#[instrument(skip(service))]
pub async fn create_session(State(service): State<WizardService>) -> impl IntoResponse {
    let snapshot = service.create_session().await;
    (StatusCode::CREATED, Json(snapshot))
}

/// Current step, draft and guard status
#[utoipa::path(
    get,
    path = "/api/v1/wizard/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    responses(
        (status = 200, description = "Session state", body = WizardSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "wizard"
)]
#[instrument(skip(service))]
pub async fn get_session(
    State(service): State<WizardService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    let snapshot = service.get_session(id).await.map_err(error_response)?;
    Ok((StatusCode::OK, Json(snapshot)))
}

/// Merge a partial record into the draft
#[utoipa::path(
    patch,
    path = "/api/v1/wizard/sessions/{id}/draft",
    request_body = DraftPatch,
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    responses(
        (status = 200, description = "Draft updated", body = WizardSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Submission in progress", body = ErrorResponse),
    ),
    tag = "wizard"
)]
#[instrument(skip(service, patch))]
pub async fn update_draft(
    State(service): State<WizardService>,
    Path(id): Path<Uuid>,
    Json(patch): Json<DraftPatch>,
) -> Result<impl IntoResponse, Response> {
    let snapshot = service.update_draft(id, patch).await.map_err(error_response)?;
    Ok((StatusCode::OK, Json(snapshot)))
}

/// Apply a step action such as toggling a body area or answering a question
#[utoipa::path(
    post,
    path = "/api/v1/wizard/sessions/{id}/actions",
    request_body = StepAction,
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    responses(
        (status = 200, description = "Action applied", body = WizardSnapshot),
        (status = 400, description = "Action does not apply", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Submission in progress", body = ErrorResponse),
    ),
    tag = "wizard"
)]
#[instrument(skip(service))]
pub async fn apply_action(
    State(service): State<WizardService>,
    Path(id): Path<Uuid>,
    Json(action): Json<StepAction>,
) -> Result<impl IntoResponse, Response> {
    let snapshot = service.apply_action(id, action).await.map_err(error_response)?;
    Ok((StatusCode::OK, Json(snapshot)))
}

/// Leave the current step if its guard is met
#[utoipa::path(
    post,
    path = "/api/v1/wizard/sessions/{id}/continue",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    responses(
        (status = 200, description = "Moved to the next step", body = WizardSnapshot),
        (status = 400, description = "No step after save", body = ErrorResponse),
        (status = 422, description = "Step guard not met", body = ErrorResponse),
    ),
    tag = "wizard"
)]
#[instrument(skip(service))]
pub async fn continue_step(
    State(service): State<WizardService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    let snapshot = service.continue_step(id).await.map_err(error_response)?;
    Ok((StatusCode::OK, Json(snapshot)))
}

/// Go back one step
#[utoipa::path(
    post,
    path = "/api/v1/wizard/sessions/{id}/back",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    responses(
        (status = 200, description = "Moved to the previous step", body = WizardSnapshot),
        (status = 409, description = "Submission in progress", body = ErrorResponse),
    ),
    tag = "wizard"
)]
#[instrument(skip(service))]
pub async fn back(
    State(service): State<WizardService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    let snapshot = service.back(id).await.map_err(error_response)?;
    Ok((StatusCode::OK, Json(snapshot)))
}

/// Jump back to an earlier step
#[utoipa::path(
    post,
    path = "/api/v1/wizard/sessions/{id}/go-to",
    request_body = GoToRequest,
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    responses(
        (status = 200, description = "Moved to the requested step", body = WizardSnapshot),
        (status = 400, description = "Step is ahead of the current one", body = ErrorResponse),
    ),
    tag = "wizard"
)]
#[instrument(skip(service))]
pub async fn go_to(
    State(service): State<WizardService>,
    Path(id): Path<Uuid>,
    Json(request): Json<GoToRequest>,
) -> Result<impl IntoResponse, Response> {
    let snapshot = service.go_to(id, request.step).await.map_err(error_response)?;
    Ok((StatusCode::OK, Json(snapshot)))
}

/// Save the record from the save step; the session ends on success
#[utoipa::path(
    post,
    path = "/api/v1/wizard/sessions/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    responses(
        (status = 201, description = "Record saved", body = PublicDailyRecord),
        (status = 400, description = "Session is not at the save step", body = ErrorResponse),
        (status = 409, description = "Submission in progress", body = ErrorResponse),
        (status = 500, description = "Record could not be stored; draft kept", body = ErrorResponse),
    ),
    tag = "wizard"
)]
#[instrument(skip(service))]
pub async fn submit(
    State(service): State<WizardService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    let record = service.submit(id).await.map_err(error_response)?;
    info!("Wizard session {} saved record {}", id, record.id);
    Ok((StatusCode::CREATED, Json(PublicDailyRecord::from(record))))
}

/// Reset and discard a session
#[utoipa::path(
    delete,
    path = "/api/v1/wizard/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "A submission is in progress", body = ErrorResponse),
    ),
    tag = "wizard"
)]
#[instrument(skip(service))]
pub async fn abandon_session(
    State(service): State<WizardService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    service.abandon(id).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
