// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

pub use alivia_data::repository::tests::{MockDailyRecordRepository, SubmissionGate};

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::daily_record::{DailyRecord, DailyRecordDraft, DailyRecordSubmission};
use crate::entities::history::{HistoryView, TimeRange};
use crate::health::{
    overall_status, ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth,
};
use crate::services::daily_record::{DailyRecordServiceError, DailyRecordServiceTrait};
use crate::services::{history, triage};

/// Mock implementation of the DailyRecordServiceTrait for testing
#[derive(Debug, Default)]
pub struct MockDailyRecordService {
    records: RwLock<HashMap<String, DailyRecord>>,
    keys: RwLock<HashMap<String, String>>,
    should_fail_submission: bool,
    submit_calls: Arc<AtomicUsize>,
}

impl MockDailyRecordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to reject every submission
    pub fn with_submission_failure(mut self) -> Self {
        self.should_fail_submission = true;
        self
    }

    /// Add a pre-defined record
    pub fn with_record(self, record: DailyRecord) -> Self {
        if let Ok(mut records) = self.records.write() {
            records.insert(record.id.clone(), record);
        }
        self
    }

    /// Counter shared with the mock, readable after it has been moved into a service
    pub fn submit_counter(&self) -> Arc<AtomicUsize> {
        self.submit_calls.clone()
    }

    fn lock_error<T>(_: T) -> DailyRecordServiceError {
        DailyRecordServiceError::Repository("mock lock poisoned".to_string())
    }
}

/// Build a stored record from a draft dated `date`
pub fn record_from_draft(draft: DailyRecordDraft, date: DateTime<Utc>) -> DailyRecord {
    DailyRecord {
        id: format!("record-{}", Uuid::new_v4()),
        draft,
        date,
        created_at: date,
        idempotency_key: None,
    }
}

#[async_trait]
impl DailyRecordServiceTrait for MockDailyRecordService {
    fn validate_draft(&self, draft: &DailyRecordDraft) -> Result<(), DailyRecordServiceError> {
        if draft.primary_pain_area.is_empty() {
            return Err(DailyRecordServiceError::Validation(
                "primaryPainArea: a primary pain area is required".to_string(),
            ));
        }
        Ok(())
    }

    async fn submit(&self, mut submission: DailyRecordSubmission) -> Result<DailyRecord, DailyRecordServiceError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.validate_draft(&submission.draft)?;

        if self.should_fail_submission {
            return Err(DailyRecordServiceError::Repository(
                "Repository error - mock is configured to fail submission".to_string(),
            ));
        }

        if let Some(key) = &submission.idempotency_key {
            let keys = self.keys.read().map_err(Self::lock_error)?;
            if let Some(existing) = keys.get(key) {
                let records = self.records.read().map_err(Self::lock_error)?;
                if let Some(record) = records.get(existing) {
                    return Ok(record.clone());
                }
            }
        }

        submission.draft.recommendation = Some(triage::compute_recommendation(&submission.draft));
        let mut record = record_from_draft(submission.draft, submission.date.unwrap_or_else(Utc::now));
        record.idempotency_key = submission.idempotency_key.clone();

        if let Some(key) = submission.idempotency_key {
            self.keys
                .write()
                .map_err(Self::lock_error)?
                .insert(key, record.id.clone());
        }
        self.records
            .write()
            .map_err(Self::lock_error)?
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_record(&self, id: &str) -> Result<DailyRecord, DailyRecordServiceError> {
        let records = self.records.read().map_err(Self::lock_error)?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| DailyRecordServiceError::NotFound(format!("Daily record with ID {} not found", id)))
    }

    async fn get_all_records(&self) -> Result<Vec<DailyRecord>, DailyRecordServiceError> {
        let records = self.records.read().map_err(Self::lock_error)?;
        let mut all: Vec<DailyRecord> = records.values().cloned().collect();
        history::sort_newest_first(&mut all);
        Ok(all)
    }

    async fn get_history(
        &self,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> Result<HistoryView, DailyRecordServiceError> {
        let records = self.get_all_records().await?;
        Ok(history::build_history(records, range, now))
    }
}

/// Mock implementation of health services for testing system health
#[derive(Debug)]
pub struct MockHealthService {
    storage_status: ComponentStatus,
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            storage_status: ComponentStatus::Healthy,
            components: HashMap::new(),
        }
    }

    pub fn with_degraded_storage(mut self) -> Self {
        self.storage_status = ComponentStatus::Degraded;
        self
    }

    pub fn with_unhealthy_storage(mut self) -> Self {
        self.storage_status = ComponentStatus::Unhealthy;
        self
    }

    /// Add a custom component with a specific status
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components
            .insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = self.components.clone();
        components.insert(
            "storage".to_string(),
            HealthComponent {
                status: self.storage_status.clone(),
                details: match self.storage_status {
                    ComponentStatus::Healthy => None,
                    ComponentStatus::Degraded => Some("Storage is slow to respond".to_string()),
                    ComponentStatus::Unhealthy => Some("Storage write failed".to_string()),
                },
            },
        );

        SystemHealth {
            status: overall_status(components.values()),
            components,
        }
    }

    async fn check_storage_status(&self) -> Result<bool, String> {
        match self.storage_status {
            ComponentStatus::Healthy => Ok(true),
            ComponentStatus::Degraded => Ok(false),
            ComponentStatus::Unhealthy => Err("Storage write failed".to_string()),
        }
    }
}

/// Factory function to create a mock health service
pub fn create_mock_health_service() -> impl HealthServiceTrait {
    MockHealthService::new()
}
