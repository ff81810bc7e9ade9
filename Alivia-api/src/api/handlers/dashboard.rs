use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::instrument;

use alivia_domain::entities::DashboardSummary;
use alivia_domain::services::DashboardServiceTrait;

use crate::entities::common::ErrorResponse;

/// Service type for dependency injection
pub type DashboardService = Arc<dyn DashboardServiceTrait + Send + Sync>;

/// Patient dashboard: 7-day average, stats, emotional state and next dose
#[utoipa::path(
    get,
    path = "/api/v1/patient/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "dashboard"
)]
#[instrument(skip(service))]
pub async fn get_dashboard(State(service): State<DashboardService>) -> Result<impl IntoResponse, Response> {
    let summary = service
        .get_summary(Utc::now())
        .await
        .map_err(|e| ErrorResponse::from(e).into_response())?;
    Ok((StatusCode::OK, Json(summary)))
}
