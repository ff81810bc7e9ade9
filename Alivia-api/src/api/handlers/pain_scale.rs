use axum::{
    extract::{Json, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use alivia_domain::services::pain_scale::{self, PainFace, PainScaleReading};

use crate::entities::common::ErrorResponse;

/// Query parameters for the pain scale lookup
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PainScaleQuery {
    /// Intensity to map; clamped to 1..=10
    pub value: Option<f64>,
}

/// Face and colour for an intensity value
#[utoipa::path(
    get,
    path = "/api/v1/patient/pain-scale",
    params(PainScaleQuery),
    responses(
        (status = 200, description = "Closest face and scale colour", body = PainScaleReading),
        (status = 400, description = "Missing value", body = ErrorResponse),
    ),
    tag = "pain_scale"
)]
#[instrument]
pub async fn get_pain_scale(Query(query): Query<PainScaleQuery>) -> Result<impl IntoResponse, Response> {
    let value = query
        .value
        .ok_or_else(|| ErrorResponse::bad_request("Query parameter 'value' is required").into_response())?;
    Ok((StatusCode::OK, Json(pain_scale::reading(value))))
}

/// The six faces of the scale
#[utoipa::path(
    get,
    path = "/api/v1/patient/pain-scale/faces",
    responses(
        (status = 200, description = "Scale faces, lowest first", body = [PainFace]),
    ),
    tag = "pain_scale"
)]
pub async fn get_pain_faces() -> Json<Vec<PainFace>> {
    Json(pain_scale::FACES.to_vec())
}
