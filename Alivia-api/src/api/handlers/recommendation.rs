use axum::{extract::Json, http::StatusCode, response::IntoResponse};
use tracing::{debug, instrument};

use alivia_domain::entities::Recommendation;
use alivia_domain::services::triage;

use crate::entities::recommendation::RecommendationRequest;

/// Triage a pain record remotely. Same rules as the local engine.
#[utoipa::path(
    post,
    path = "/api/v1/patient/pain-record/recommendation",
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "Care pathway for the given answers", body = Recommendation),
    ),
    tag = "recommendation"
)]
#[instrument]
pub async fn create_recommendation(Json(request): Json<RecommendationRequest>) -> impl IntoResponse {
    let recommendation = triage::recommend(request.triage_input());
    debug!("Remote triage resolved to {}", recommendation.category);
    (StatusCode::OK, Json(recommendation))
}
