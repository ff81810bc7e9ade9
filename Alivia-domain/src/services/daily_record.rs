use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info};
use validator::Validate;

use alivia_data::repository::{DailyRecordRepositoryTrait, RepositoryError};

use crate::entities::conversions;
use crate::entities::daily_record::{DailyRecord, DailyRecordDraft, DailyRecordSubmission};
use crate::entities::history::{HistoryView, TimeRange};
use crate::services::{history, triage};

/// Daily record service errors
#[derive(Debug, Error)]
pub enum DailyRecordServiceError {
    /// The record breaks a field or cross-field rule
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    /// The persistence collaborator failed
    #[error("Repository error: {0}")]
    Repository(String),
}

/// Join validator field errors into "field: message; field: message"
pub fn describe_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect();
    fields.sort();
    fields.join("; ")
}

/// Trait for daily record service operations
#[async_trait]
pub trait DailyRecordServiceTrait {
    /// Check field ranges and cross-field rules of a completed draft
    fn validate_draft(&self, draft: &DailyRecordDraft) -> Result<(), DailyRecordServiceError>;

    /// Persist a completed draft. The recommendation is recomputed before storing.
    /// Resubmitting with the same idempotency key returns the original record.
    async fn submit(&self, submission: DailyRecordSubmission) -> Result<DailyRecord, DailyRecordServiceError>;

    /// Get a record by ID
    async fn get_record(&self, id: &str) -> Result<DailyRecord, DailyRecordServiceError>;

    /// All records, newest first
    async fn get_all_records(&self) -> Result<Vec<DailyRecord>, DailyRecordServiceError>;

    /// Records inside `range` with chart series and stats
    async fn get_history(
        &self,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> Result<HistoryView, DailyRecordServiceError>;
}

/// Daily record service for domain logic
pub struct DailyRecordService<R: DailyRecordRepositoryTrait> {
    repository: R,
}

impl<R: DailyRecordRepositoryTrait> DailyRecordService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    fn map_repo_error(&self, err: RepositoryError) -> DailyRecordServiceError {
        match err {
            RepositoryError::NotFound(msg) => DailyRecordServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => DailyRecordServiceError::Validation(msg),
            _ => DailyRecordServiceError::Repository(err.to_string()),
        }
    }

    fn convert_all(
        &self,
        records: Vec<alivia_data::models::daily_record::DailyRecord>,
    ) -> Result<Vec<DailyRecord>, DailyRecordServiceError> {
        records
            .into_iter()
            .map(|r| conversions::convert_to_domain_record(r).map_err(DailyRecordServiceError::Repository))
            .collect()
    }
}

#[async_trait]
impl<R: DailyRecordRepositoryTrait + Send + Sync> DailyRecordServiceTrait for DailyRecordService<R> {
    fn validate_draft(&self, draft: &DailyRecordDraft) -> Result<(), DailyRecordServiceError> {
        if let Err(errors) = draft.validate() {
            return Err(DailyRecordServiceError::Validation(describe_validation_errors(&errors)));
        }

        if draft.primary_pain_area.trim().is_empty() {
            return Err(DailyRecordServiceError::Validation(
                "primaryPainArea: a primary pain area is required".to_string(),
            ));
        }

        draft
            .check_invariants()
            .map_err(DailyRecordServiceError::Validation)
    }

    async fn submit(&self, mut submission: DailyRecordSubmission) -> Result<DailyRecord, DailyRecordServiceError> {
        self.validate_draft(&submission.draft)?;

        let recommendation = triage::compute_recommendation(&submission.draft);
        debug!("Submitting daily record with category {}", recommendation.category);
        submission.draft.recommendation = Some(recommendation);

        let data_request = conversions::convert_to_data_create_request(&submission);
        let stored = self.repository.create(data_request).await.map_err(|e| {
            error!("Failed to store daily record: {}", e);
            self.map_repo_error(e)
        })?;

        let record = conversions::convert_to_domain_record(stored)
            .map_err(DailyRecordServiceError::Repository)?;
        info!("Daily record stored: {}", record.id);
        Ok(record)
    }

    async fn get_record(&self, id: &str) -> Result<DailyRecord, DailyRecordServiceError> {
        let stored = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| DailyRecordServiceError::NotFound(format!("Daily record with ID {} not found", id)))?;

        conversions::convert_to_domain_record(stored).map_err(DailyRecordServiceError::Repository)
    }

    async fn get_all_records(&self) -> Result<Vec<DailyRecord>, DailyRecordServiceError> {
        let (stored, _) = self
            .repository
            .get_filtered(None, None, None, None, Some(true))
            .await
            .map_err(|e| self.map_repo_error(e))?;

        let mut records = self.convert_all(stored)?;
        history::sort_newest_first(&mut records);
        Ok(records)
    }

    async fn get_history(
        &self,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> Result<HistoryView, DailyRecordServiceError> {
        let start = range.start(now).map(|d| d.to_rfc3339());
        let (stored, total) = self
            .repository
            .get_filtered(start, None, None, None, Some(true))
            .await
            .map_err(|e| self.map_repo_error(e))?;
        debug!("Loaded {} records for history range {:?}", total, range);

        let records = self.convert_all(stored)?;
        Ok(history::build_history(records, range, now))
    }
}

/// Create a daily record service over an empty in-memory repository
pub fn create_default_daily_record_service() -> impl DailyRecordServiceTrait + Send + Sync {
    DailyRecordService::new(alivia_data::repository::DailyRecordRepository::new())
}

/// Create a daily record service over the mock history
pub async fn create_seeded_daily_record_service(
) -> Result<impl DailyRecordServiceTrait + Send + Sync, DailyRecordServiceError> {
    let repository = alivia_data::repository::DailyRecordRepository::with_records(
        alivia_data::seed::mock_daily_records(),
    )
    .await
    .map_err(|e| DailyRecordServiceError::Repository(e.to_string()))?;
    Ok(DailyRecordService::new(repository))
}

/// Create a mock daily record service for testing
#[cfg(feature = "mock")]
pub fn create_mock_daily_record_service() -> impl DailyRecordServiceTrait + Send + Sync {
    crate::testing::MockDailyRecordService::new()
}
