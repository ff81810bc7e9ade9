use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

use alivia_domain::entities::{DailyRecordSubmission, TimeRange, PAIN_QUALITY_TAGS};
use alivia_domain::services::{
    create_default_daily_record_service, create_seeded_daily_record_service, DailyRecordServiceError,
    DailyRecordServiceTrait,
};

use crate::entities::common::ErrorResponse;
use crate::entities::daily_record::{CreateDailyRecordRequest, HistoryResponse, PublicDailyRecord};

/// Header carrying the client-minted submission key
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Query parameters for retrieving the record history
#[derive(Debug, Deserialize, Clone, IntoParams, ToSchema)]
pub struct HistoryQueryParams {
    /// `7days` (default), `30days`, `90days` or `all`
    pub range: Option<String>,
}

/// Service type for dependency injection
pub type DailyRecordService = Arc<dyn DailyRecordServiceTrait + Send + Sync>;

/// Create a service over an empty in-memory repository
pub fn create_service() -> DailyRecordService {
    Arc::new(create_default_daily_record_service())
}

/// Create a service preloaded with the mock history
pub async fn create_seeded_service() -> Result<DailyRecordService, DailyRecordServiceError> {
    Ok(Arc::new(create_seeded_daily_record_service().await?))
}

/// Header key first, then the body key. Blank keys count as absent.
fn idempotency_key(headers: &HeaderMap, fallback: Option<String>) -> Result<Option<String>, Response> {
    let header_key = match headers.get(IDEMPOTENCY_KEY_HEADER) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| ErrorResponse::bad_request("Idempotency-Key must be printable ASCII").into_response())?
                .trim()
                .to_string(),
        ),
        None => None,
    };

    Ok(header_key
        .into_iter()
        .chain(fallback.map(|key| key.trim().to_string()))
        .find(|key| !key.is_empty()))
}

/// Submit a daily pain record
#[utoipa::path(
    post,
    path = "/api/v1/patient/daily-records",
    request_body = CreateDailyRecordRequest,
    params(
        ("Idempotency-Key" = Option<String>, Header, description = "Repeating a key returns the record it created")
    ),
    responses(
        (status = 201, description = "Daily record stored", body = PublicDailyRecord),
        (status = 400, description = "Invalid record", body = ErrorResponse),
        (status = 500, description = "Record could not be stored", body = ErrorResponse),
    ),
    tag = "daily_records"
)]
#[instrument(skip(service, headers, request))]
pub async fn create_daily_record(
    State(service): State<DailyRecordService>,
    headers: HeaderMap,
    Json(request): Json<CreateDailyRecordRequest>,
) -> Result<impl IntoResponse, Response> {
    let idempotency_key = idempotency_key(&headers, request.idempotency_key)?;

    let submission = DailyRecordSubmission {
        draft: request.draft,
        idempotency_key,
        date: request.date,
    };

    let record = service
        .submit(submission)
        .await
        .map_err(|e| ErrorResponse::from(e).into_response())?;

    info!("Daily record created with ID: {}", record.id);
    Ok((StatusCode::CREATED, Json(PublicDailyRecord::from(record))))
}

/// Get the record history with chart series and stats
#[utoipa::path(
    get,
    path = "/api/v1/patient/daily-records",
    params(HistoryQueryParams),
    responses(
        (status = 200, description = "History retrieved", body = HistoryResponse),
        (status = 400, description = "Unknown range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "daily_records"
)]
#[instrument(skip(service))]
pub async fn get_daily_records(
    State(service): State<DailyRecordService>,
    Query(params): Query<HistoryQueryParams>,
) -> Result<impl IntoResponse, Response> {
    let range = match params.range.as_deref() {
        Some(raw) => raw
            .parse::<TimeRange>()
            .map_err(|_| {
                ErrorResponse::bad_request("Invalid range. Use 7days, 30days, 90days or all").into_response()
            })?,
        None => TimeRange::default(),
    };

    let view = service
        .get_history(range, Utc::now())
        .await
        .map_err(|e| ErrorResponse::from(e).into_response())?;

    Ok((StatusCode::OK, Json(HistoryResponse::from(view))))
}

/// Get a single daily record by ID
#[utoipa::path(
    get,
    path = "/api/v1/patient/daily-records/{id}",
    params(
        ("id" = String, Path, description = "Daily record ID")
    ),
    responses(
        (status = 200, description = "Daily record found", body = PublicDailyRecord),
        (status = 404, description = "Daily record not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "daily_records"
)]
#[instrument(skip(service))]
pub async fn get_daily_record(
    State(service): State<DailyRecordService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Response> {
    let record = service
        .get_record(&id)
        .await
        .map_err(|e| ErrorResponse::from(e).into_response())?;

    Ok((StatusCode::OK, Json(PublicDailyRecord::from(record))))
}

/// List the known pain quality tags
#[utoipa::path(
    get,
    path = "/api/v1/patient/pain-qualities",
    responses(
        (status = 200, description = "Known pain quality tags", body = [String]),
    ),
    tag = "daily_records"
)]
pub async fn get_pain_quality_tags() -> Json<Vec<&'static str>> {
    Json(PAIN_QUALITY_TAGS.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_key(key: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(IDEMPOTENCY_KEY_HEADER, HeaderValue::from_static(key));
        headers
    }

    #[test]
    fn test_header_key_takes_precedence() {
        let key = idempotency_key(&headers_with_key(" abc "), Some("body".to_string())).unwrap();
        assert_eq!(key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_blank_keys_are_ignored() {
        assert_eq!(idempotency_key(&headers_with_key("   "), None).unwrap(), None);
        assert_eq!(idempotency_key(&HeaderMap::new(), Some("".to_string())).unwrap(), None);

        let key = idempotency_key(&headers_with_key(""), Some("body".to_string())).unwrap();
        assert_eq!(key.as_deref(), Some("body"));
    }
}
