use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::models::daily_record::{CreateDailyRecordRequest, DailyRecord};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;

/// Repository trait for submitted daily records
#[async_trait]
pub trait DailyRecordRepositoryTrait {
    /// Store a new record. A request carrying an idempotency key that was already
    /// stored returns the original record instead of creating a second one.
    async fn create(&self, request: CreateDailyRecordRequest) -> Result<DailyRecord, RepositoryError>;

    /// Get all records
    async fn get_all(&self) -> Result<Vec<DailyRecord>, RepositoryError>;

    /// Get the most recent record
    async fn get_latest(&self) -> Result<Option<DailyRecord>, RepositoryError>;

    /// Get a record by ID
    async fn get_by_id(&self, id: &str) -> Result<Option<DailyRecord>, RepositoryError>;

    /// Get filtered records
    async fn get_filtered(
        &self,
        start_date: Option<String>,
        end_date: Option<String>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<DailyRecord>, usize), RepositoryError>;
}

/// Build a stored record from a request, minting the id and timestamps
pub fn build_record(request: CreateDailyRecordRequest) -> DailyRecord {
    let now = Utc::now().to_rfc3339();

    DailyRecord {
        id: format!("record-{}", Uuid::new_v4()),
        idempotency_key: request.idempotency_key,
        primary_pain_area: request.primary_pain_area,
        secondary_pain_areas: request.secondary_pain_areas,
        is_usual_place: request.is_usual_place,
        pain_intensity: request.pain_intensity,
        pain_qualities: request.pain_qualities,
        pain_quality_other: request.pain_quality_other,
        duration_unit: request.duration_unit,
        duration_value: request.duration_value,
        has_had_before: request.has_had_before,
        weekly_frequency: request.weekly_frequency,
        functional_impact_physical: request.functional_impact_physical,
        functional_impact_work: request.functional_impact_work,
        functional_impact_social: request.functional_impact_social,
        phq2_answer1: request.phq2_answer1,
        phq2_answer2: request.phq2_answer2,
        gad2_answer1: request.gad2_answer1,
        gad2_answer2: request.gad2_answer2,
        took_medication: request.took_medication,
        medication_id: request.medication_id,
        medication_relief: request.medication_relief,
        recommendation_category: request.recommendation_category,
        recommendation_message: request.recommendation_message,
        pain_areas: request.pain_areas,
        pain_types: request.pain_types,
        pain_duration_unit: request.pain_duration_unit,
        pain_duration_value: request.pain_duration_value,
        date: request.date.unwrap_or_else(|| now.clone()),
        created_at: now,
    }
}

/// Repository for daily records backed by in-memory storage
#[derive(Debug, Clone, Default)]
pub struct DailyRecordRepository {
    storage: InMemoryStorage,
}

impl DailyRecordRepository {
    /// Create a new, empty repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
        }
    }

    /// Create a repository preloaded with records
    pub async fn with_records(records: Vec<DailyRecord>) -> Result<Self, RepositoryError> {
        let repository = Self::new();
        for record in &records {
            repository.storage.store_record(record).await?;
        }
        debug!("Seeded daily record repository with {} records", records.len());
        Ok(repository)
    }
}

#[async_trait]
impl DailyRecordRepositoryTrait for DailyRecordRepository {
    async fn create(&self, request: CreateDailyRecordRequest) -> Result<DailyRecord, RepositoryError> {
        let record = build_record(request);
        let (stored, inserted) = self.storage.store_record(&record).await?;

        if inserted {
            debug!("Stored daily record: {}", stored.id);
        } else {
            debug!(
                "Idempotency key already used, returning existing record: {}",
                stored.id
            );
        }

        Ok(stored)
    }

    async fn get_all(&self) -> Result<Vec<DailyRecord>, RepositoryError> {
        self.storage.get_all().await
    }

    async fn get_latest(&self) -> Result<Option<DailyRecord>, RepositoryError> {
        self.storage.get_latest().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<DailyRecord>, RepositoryError> {
        self.storage.get_by_id(id).await
    }

    async fn get_filtered(
        &self,
        start_date: Option<String>,
        end_date: Option<String>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<DailyRecord>, usize), RepositoryError> {
        self.storage
            .get_filtered(
                start_date.as_deref(),
                end_date.as_deref(),
                limit,
                offset,
                sort_desc,
            )
            .await
    }
}

/// Mock daily record repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Holds `create` calls in flight until released
    #[derive(Debug, Clone, Default)]
    pub struct SubmissionGate {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    impl SubmissionGate {
        pub fn new() -> Self {
            Self::default()
        }

        /// Resolves once a `create` call is waiting on the gate
        pub async fn wait_until_entered(&self) {
            self.entered.notified().await;
        }

        /// Let the waiting `create` call proceed
        pub fn release(&self) {
            self.release.notify_one();
        }

        async fn pass(&self) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }

    /// Repository double that can be told to reject or hold writes
    #[derive(Debug, Clone, Default)]
    pub struct MockDailyRecordRepository {
        inner: DailyRecordRepository,
        fail_writes: bool,
        gate: Option<SubmissionGate>,
        create_calls: Arc<AtomicUsize>,
    }

    impl MockDailyRecordRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository whose `create` always fails
        pub fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }

        /// Create a mock repository whose `create` blocks until `gate` is released
        pub fn gated(gate: SubmissionGate) -> Self {
            Self {
                gate: Some(gate),
                ..Self::default()
            }
        }

        /// Create a mock repository with predefined records
        pub async fn with_records(records: Vec<DailyRecord>) -> Self {
            let inner = DailyRecordRepository::with_records(records)
                .await
                .unwrap_or_default();
            Self {
                inner,
                ..Self::default()
            }
        }

        /// Number of times `create` was called, successful or not
        pub fn create_calls(&self) -> usize {
            self.create_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DailyRecordRepositoryTrait for MockDailyRecordRepository {
        async fn create(&self, request: CreateDailyRecordRequest) -> Result<DailyRecord, RepositoryError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.pass().await;
            }
            if self.fail_writes {
                return Err(RepositoryError::Unavailable("mock backend rejected the write".to_string()));
            }
            self.inner.create(request).await
        }

        async fn get_all(&self) -> Result<Vec<DailyRecord>, RepositoryError> {
            self.inner.get_all().await
        }

        async fn get_latest(&self) -> Result<Option<DailyRecord>, RepositoryError> {
            self.inner.get_latest().await
        }

        async fn get_by_id(&self, id: &str) -> Result<Option<DailyRecord>, RepositoryError> {
            self.inner.get_by_id(id).await
        }

        async fn get_filtered(
            &self,
            start_date: Option<String>,
            end_date: Option<String>,
            limit: Option<usize>,
            offset: Option<usize>,
            sort_desc: Option<bool>,
        ) -> Result<(Vec<DailyRecord>, usize), RepositoryError> {
            self.inner
                .get_filtered(start_date, end_date, limit, offset, sort_desc)
                .await
        }
    }

    pub fn sample_request(intensity: f64, date: &str) -> CreateDailyRecordRequest {
        CreateDailyRecordRequest {
            idempotency_key: None,
            primary_pain_area: "back-lower".to_string(),
            secondary_pain_areas: vec![],
            is_usual_place: true,
            pain_intensity: intensity,
            pain_qualities: vec!["aching".to_string()],
            pain_quality_other: String::new(),
            duration_unit: "hours".to_string(),
            duration_value: 3,
            has_had_before: Some(false),
            weekly_frequency: None,
            functional_impact_physical: 2,
            functional_impact_work: 1,
            functional_impact_social: 0,
            phq2_answer1: Some(0),
            phq2_answer2: Some(1),
            gad2_answer1: Some(0),
            gad2_answer2: Some(0),
            took_medication: Some(false),
            medication_id: None,
            medication_relief: None,
            recommendation_category: Some("autocuidado".to_string()),
            recommendation_message: None,
            pain_areas: r#"["back-lower"]"#.to_string(),
            pain_types: r#"["aching"]"#.to_string(),
            pain_duration_unit: "hours".to_string(),
            pain_duration_value: 3,
            date: Some(date.to_string()),
        }
    }

    #[cfg(test)]
    mod cases {
        use super::*;

        #[tokio::test]
        async fn test_create_mints_id_and_timestamps() {
            let repo = DailyRecordRepository::new();
            let record = repo.create(sample_request(4.5, "2024-03-01T10:00:00+00:00")).await.unwrap();

            assert!(record.id.starts_with("record-"));
            assert_eq!(record.date, "2024-03-01T10:00:00+00:00");
            assert!(!record.created_at.is_empty());
            assert_eq!(repo.get_all().await.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn test_create_defaults_date_to_now() {
            let repo = DailyRecordRepository::new();
            let mut request = sample_request(3.0, "unused");
            request.date = None;
            let record = repo.create(request).await.unwrap();
            assert_eq!(record.date, record.created_at);
        }

        #[tokio::test]
        async fn test_repeated_idempotency_key_returns_original() {
            let repo = DailyRecordRepository::new();
            let mut request = sample_request(6.0, "2024-03-01T10:00:00+00:00");
            request.idempotency_key = Some("key-1".to_string());

            let first = repo.create(request.clone()).await.unwrap();
            let second = repo.create(request).await.unwrap();

            assert_eq!(first.id, second.id);
            assert_eq!(repo.get_all().await.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn test_clones_share_storage() {
            let repo = DailyRecordRepository::new();
            let clone = repo.clone();
            clone.create(sample_request(2.0, "2024-03-01T10:00:00+00:00")).await.unwrap();
            assert_eq!(repo.get_all().await.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn test_get_filtered_sorts_and_pages() {
            let repo = DailyRecordRepository::new();
            for day in 1..=5 {
                let date = format!("2024-03-0{}T10:00:00+00:00", day);
                repo.create(sample_request(day as f64, &date)).await.unwrap();
            }

            let (page, total) = repo
                .get_filtered(Some("2024-03-02".to_string()), None, Some(2), Some(0), Some(true))
                .await
                .unwrap();
            assert_eq!(total, 4);
            assert_eq!(page.len(), 2);
            assert_eq!(page[0].pain_intensity, 5.0);
            assert_eq!(page[1].pain_intensity, 4.0);

            let (asc, _) = repo.get_filtered(None, None, None, None, Some(false)).await.unwrap();
            assert_eq!(asc[0].pain_intensity, 1.0);

            let latest = repo.get_latest().await.unwrap().unwrap();
            assert_eq!(latest.pain_intensity, 5.0);
        }

        #[tokio::test]
        async fn test_get_filtered_rejects_offset_past_end() {
            let repo = DailyRecordRepository::new();
            repo.create(sample_request(2.0, "2024-03-01T10:00:00+00:00")).await.unwrap();
            let result = repo.get_filtered(None, None, None, Some(5), None).await;
            assert!(matches!(result, Err(RepositoryError::Pagination(_))));
        }

        #[tokio::test]
        async fn test_failing_mock_counts_calls() {
            let repo = MockDailyRecordRepository::failing();
            let result = repo.create(sample_request(2.0, "2024-03-01T10:00:00+00:00")).await;
            assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
            assert_eq!(repo.create_calls(), 1);
            assert!(repo.get_all().await.unwrap().is_empty());
        }
    }
}
