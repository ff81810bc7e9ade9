use thiserror::Error;

use crate::services::daily_record::DailyRecordServiceError;
use crate::services::medication::MedicationServiceError;

use super::step::WizardStep;

/// Wizard errors
#[derive(Debug, Error)]
pub enum WizardError {
    /// The current step's continue-guard is not met
    #[error("{message}")]
    Guard {
        step: WizardStep,
        missing: Vec<&'static str>,
        message: &'static str,
    },

    /// A submission is in flight for this session
    #[error("A submission is already in progress for this session")]
    SubmissionPending,

    #[error("Wizard session not found: {0}")]
    SessionNotFound(String),

    /// The action does not apply to the current draft
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// The requested navigation is not allowed from the current step
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// The persistence collaborator rejected the record; the draft is kept
    #[error("Submission failed: {0}")]
    Submission(#[from] DailyRecordServiceError),

    #[error("Medication lookup failed: {0}")]
    Medications(#[from] MedicationServiceError),
}
