use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use alivia_domain::services::{DailyRecordServiceError, DashboardServiceError, MedicationServiceError};
use alivia_domain::wizard::WizardError;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details,
        }
    }

    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self::new(
            "not_found",
            format!("The requested {} could not be found", resource),
            None,
        )
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self::new("validation_error", message, details)
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self::new("bad_request", message, None)
    }

    /// A wizard step cannot be left yet; `missing` names the unanswered fields
    pub fn guard_failed(message: &str, missing: &[&str]) -> Self {
        Self::new(
            "guard_failed",
            message,
            Some(serde_json::json!({ "missing": missing })),
        )
    }

    pub fn submission_pending() -> Self {
        Self::new(
            "submission_pending",
            "A submission is already in progress for this session",
            None,
        )
    }

    /// The record could not be stored; the client may retry
    pub fn submission_failed() -> Self {
        Self::new(
            "submission_failed",
            "The daily record could not be saved. Please try again.",
            None,
        )
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self::new("internal_error", "An unexpected error occurred", None)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            "guard_failed" => StatusCode::UNPROCESSABLE_ENTITY,
            "submission_pending" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<DailyRecordServiceError> for ErrorResponse {
    fn from(err: DailyRecordServiceError) -> Self {
        match err {
            DailyRecordServiceError::Validation(message) => {
                warn!("Invalid daily record: {}", message);
                ErrorResponse::validation_error(&message, None)
            }
            DailyRecordServiceError::NotFound(message) => {
                info!("{}", message);
                ErrorResponse::not_found("daily record")
            }
            DailyRecordServiceError::Repository(message) => {
                error!("Daily record storage failed: {}", message);
                ErrorResponse::submission_failed()
            }
        }
    }
}

impl From<MedicationServiceError> for ErrorResponse {
    fn from(err: MedicationServiceError) -> Self {
        match err {
            MedicationServiceError::Validation(message) => {
                warn!("Invalid medication: {}", message);
                ErrorResponse::validation_error(&message, None)
            }
            MedicationServiceError::NotFound(message) => {
                info!("{}", message);
                ErrorResponse::not_found("medication")
            }
            MedicationServiceError::Repository(message) => {
                error!("Medication storage failed: {}", message);
                ErrorResponse::internal_error()
            }
        }
    }
}

impl From<DashboardServiceError> for ErrorResponse {
    fn from(err: DashboardServiceError) -> Self {
        error!("Failed to build dashboard: {}", err);
        ErrorResponse::internal_error()
    }
}

impl From<WizardError> for ErrorResponse {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Guard { step, missing, message } => {
                info!("Guard failed at step {}: {:?}", step, missing);
                ErrorResponse::guard_failed(message, &missing)
            }
            WizardError::SubmissionPending => ErrorResponse::submission_pending(),
            WizardError::SessionNotFound(id) => {
                info!("Wizard session not found: {}", id);
                ErrorResponse::not_found("wizard session")
            }
            WizardError::InvalidAction(message) | WizardError::InvalidTransition(message) => {
                warn!("Rejected wizard request: {}", message);
                ErrorResponse::bad_request(&message)
            }
            WizardError::Submission(e) => ErrorResponse::from(e),
            WizardError::Medications(e) => ErrorResponse::from(e),
        }
    }
}
