use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use alivia_data::repository::{
    KeyValueStorage, MedicationRepository, MedicationRepositoryTrait, RepositoryError,
};

use crate::entities::conversions;
use crate::entities::medication::{DoseCountdown, Medication, MedicationReminder, MedicationRequest};
use crate::services::daily_record::describe_validation_errors;

/// Medication service errors
#[derive(Debug, Error)]
pub enum MedicationServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Medication not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

/// Time left until `medication`'s next dose, `None` when no dose is scheduled
pub fn time_until_next_dose(medication: &Medication, now: DateTime<Utc>) -> Option<DoseCountdown> {
    let next = medication.next_dose?;
    if next <= now {
        return Some(DoseCountdown::Overdue);
    }
    let remaining = next - now;
    Some(DoseCountdown::Due {
        hours: remaining.num_hours(),
        minutes: remaining.num_minutes() % 60,
    })
}

/// Trait for medication reminder operations
#[async_trait]
pub trait MedicationServiceTrait {
    /// Persisted medication list; an unreadable list is empty
    async fn list_medications(&self) -> Result<Vec<Medication>, MedicationServiceError>;

    /// Medication list with countdowns at `now`
    async fn list_reminders(&self, now: DateTime<Utc>) -> Result<Vec<MedicationReminder>, MedicationServiceError>;

    async fn get_medication(&self, id: &str) -> Result<Medication, MedicationServiceError>;

    /// Add a medication with its first dose due one interval after `now`
    async fn add_medication(
        &self,
        request: MedicationRequest,
        now: DateTime<Utc>,
    ) -> Result<Medication, MedicationServiceError>;

    /// Replace the editable fields, keeping dose times
    async fn update_medication(
        &self,
        id: &str,
        request: MedicationRequest,
    ) -> Result<Medication, MedicationServiceError>;

    /// Record a dose taken at `now` and schedule the next one
    async fn take_medication(&self, id: &str, now: DateTime<Utc>) -> Result<Medication, MedicationServiceError>;

    async fn remove_medication(&self, id: &str) -> Result<(), MedicationServiceError>;
}

/// Medication service for domain logic
pub struct MedicationService<R: MedicationRepositoryTrait> {
    repository: R,
}

impl<R: MedicationRepositoryTrait> MedicationService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    fn map_repo_error(&self, err: RepositoryError) -> MedicationServiceError {
        match err {
            RepositoryError::NotFound(msg) => MedicationServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => MedicationServiceError::Validation(msg),
            _ => {
                error!("Medication storage failed: {}", err);
                MedicationServiceError::Repository(err.to_string())
            }
        }
    }

    fn validate_request(&self, request: &MedicationRequest) -> Result<(), MedicationServiceError> {
        request
            .validate()
            .map_err(|errors| MedicationServiceError::Validation(describe_validation_errors(&errors)))?;

        if request.name.trim().is_empty() || request.dose.trim().is_empty() {
            return Err(MedicationServiceError::Validation(
                "name, dose: must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// Time of the next dose `frequency` hours after `now`
    fn next_dose_after(now: DateTime<Utc>, frequency: u32) -> Result<DateTime<Utc>, MedicationServiceError> {
        now.checked_add_signed(Duration::hours(i64::from(frequency)))
            .ok_or_else(|| {
                MedicationServiceError::Validation(format!("frequency: {} hours is out of range", frequency))
            })
    }

    fn not_found(id: &str) -> MedicationServiceError {
        MedicationServiceError::NotFound(format!("Medication with ID {} not found", id))
    }

    async fn save(&self, medication: Medication) -> Result<Medication, MedicationServiceError> {
        let stored = self
            .repository
            .upsert(conversions::convert_to_data_medication(&medication))
            .await
            .map_err(|e| self.map_repo_error(e))?;
        Ok(conversions::convert_to_domain_medication(stored))
    }
}

#[async_trait]
impl<R: MedicationRepositoryTrait + Send + Sync> MedicationServiceTrait for MedicationService<R> {
    async fn list_medications(&self) -> Result<Vec<Medication>, MedicationServiceError> {
        let medications = self.repository.list().await.map_err(|e| self.map_repo_error(e))?;
        Ok(medications
            .into_iter()
            .map(conversions::convert_to_domain_medication)
            .collect())
    }

    async fn list_reminders(&self, now: DateTime<Utc>) -> Result<Vec<MedicationReminder>, MedicationServiceError> {
        let medications = self.list_medications().await?;
        Ok(medications
            .into_iter()
            .map(|medication| MedicationReminder {
                time_until_next_dose: time_until_next_dose(&medication, now),
                medication,
            })
            .collect())
    }

    async fn get_medication(&self, id: &str) -> Result<Medication, MedicationServiceError> {
        self.repository
            .get_by_id(id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .map(conversions::convert_to_domain_medication)
            .ok_or_else(|| Self::not_found(id))
    }

    async fn add_medication(
        &self,
        request: MedicationRequest,
        now: DateTime<Utc>,
    ) -> Result<Medication, MedicationServiceError> {
        self.validate_request(&request)?;
        let next_dose = Self::next_dose_after(now, request.frequency)?;

        let medication = Medication {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            medication_type: request.medication_type,
            dose: request.dose.trim().to_string(),
            frequency: request.frequency,
            schedule: request.schedule,
            last_taken: None,
            next_dose: Some(next_dose),
        };

        let medication = self.save(medication).await?;
        info!("Medication added: {} ({})", medication.name, medication.id);
        Ok(medication)
    }

    async fn update_medication(
        &self,
        id: &str,
        request: MedicationRequest,
    ) -> Result<Medication, MedicationServiceError> {
        self.validate_request(&request)?;
        let existing = self.get_medication(id).await?;

        let medication = Medication {
            name: request.name.trim().to_string(),
            medication_type: request.medication_type,
            dose: request.dose.trim().to_string(),
            frequency: request.frequency,
            schedule: request.schedule,
            ..existing
        };
        self.save(medication).await
    }

    async fn take_medication(&self, id: &str, now: DateTime<Utc>) -> Result<Medication, MedicationServiceError> {
        let existing = self.get_medication(id).await?;
        let next_dose = Self::next_dose_after(now, existing.frequency)?;

        let medication = Medication {
            last_taken: Some(now),
            next_dose: Some(next_dose),
            ..existing
        };
        let medication = self.save(medication).await?;
        info!("Dose recorded for medication {}", medication.id);
        Ok(medication)
    }

    async fn remove_medication(&self, id: &str) -> Result<(), MedicationServiceError> {
        let removed = self.repository.remove(id).await.map_err(|e| self.map_repo_error(e))?;
        if removed {
            info!("Medication removed: {}", id);
            Ok(())
        } else {
            Err(Self::not_found(id))
        }
    }
}

/// Create a medication service over the given key-value storage
pub fn create_medication_service(
    storage: Arc<dyn KeyValueStorage>,
) -> impl MedicationServiceTrait + Send + Sync {
    MedicationService::new(MedicationRepository::new(storage))
}

/// Create a medication service over in-memory storage
pub fn create_default_medication_service() -> impl MedicationServiceTrait + Send + Sync {
    create_medication_service(Arc::new(alivia_data::repository::InMemoryKeyValueStorage::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::medication::MedicationType;
    use alivia_data::models::medication::Medication as DataMedication;
    use chrono::TimeZone;
    use mockall::mock;

    mock! {
        Repo {}

        #[async_trait]
        impl MedicationRepositoryTrait for Repo {
            async fn list(&self) -> Result<Vec<DataMedication>, RepositoryError>;
            async fn get_by_id(&self, id: &str) -> Result<Option<DataMedication>, RepositoryError>;
            async fn upsert(&self, medication: DataMedication) -> Result<DataMedication, RepositoryError>;
            async fn remove(&self, id: &str) -> Result<bool, RepositoryError>;
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    fn request(name: &str, frequency: u32) -> MedicationRequest {
        MedicationRequest {
            name: name.to_string(),
            medication_type: MedicationType::Analgesic,
            dose: "500mg".to_string(),
            frequency,
            schedule: None,
        }
    }

    fn service() -> impl MedicationServiceTrait {
        MedicationService::new(MedicationRepository::new(Arc::new(
            alivia_data::repository::InMemoryKeyValueStorage::new(),
        )))
    }

    fn medication_due(next_dose: Option<DateTime<Utc>>) -> Medication {
        Medication {
            id: "1".to_string(),
            name: "Paracetamol".to_string(),
            medication_type: MedicationType::Analgesic,
            dose: "1g".to_string(),
            frequency: 8,
            schedule: None,
            last_taken: None,
            next_dose,
        }
    }

    #[test]
    fn test_countdown() {
        assert_eq!(time_until_next_dose(&medication_due(None), now()), None);
        assert_eq!(
            time_until_next_dose(&medication_due(Some(now())), now()),
            Some(DoseCountdown::Overdue)
        );
        assert_eq!(
            time_until_next_dose(&medication_due(Some(now() - Duration::minutes(5))), now()),
            Some(DoseCountdown::Overdue)
        );
        assert_eq!(
            time_until_next_dose(
                &medication_due(Some(now() + Duration::hours(2) + Duration::minutes(35))),
                now()
            ),
            Some(DoseCountdown::Due { hours: 2, minutes: 35 })
        );
    }

    #[tokio::test]
    async fn test_add_schedules_first_dose() {
        let service = service();
        let medication = service.add_medication(request("Paracetamol", 6), now()).await.unwrap();

        assert!(!medication.id.is_empty());
        assert_eq!(medication.last_taken, None);
        assert_eq!(medication.next_dose, Some(now() + Duration::hours(6)));
        assert_eq!(service.list_medications().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_requests() {
        let service = service();
        let result = service.add_medication(request("", 8), now()).await;
        assert!(matches!(result, Err(MedicationServiceError::Validation(_))));

        let result = service.add_medication(request("Ibuprofeno", 0), now()).await;
        assert!(matches!(result, Err(MedicationServiceError::Validation(_))));

        let result = service.add_medication(request("   ", 8), now()).await;
        assert!(matches!(result, Err(MedicationServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_take_resets_schedule() {
        let service = service();
        let added = service.add_medication(request("Ibuprofeno", 8), now()).await.unwrap();

        let later = now() + Duration::hours(3);
        let taken = service.take_medication(&added.id, later).await.unwrap();
        assert_eq!(taken.last_taken, Some(later));
        assert_eq!(taken.next_dose, Some(later + Duration::hours(8)));

        let reminders = service.list_reminders(later).await.unwrap();
        assert_eq!(
            reminders[0].time_until_next_dose,
            Some(DoseCountdown::Due { hours: 8, minutes: 0 })
        );
    }

    #[tokio::test]
    async fn test_update_keeps_dose_times() {
        let service = service();
        let added = service.add_medication(request("Ibuprofeno", 8), now()).await.unwrap();

        let updated = service
            .update_medication(&added.id, request("Ibuprofeno 600", 12))
            .await
            .unwrap();
        assert_eq!(updated.name, "Ibuprofeno 600");
        assert_eq!(updated.frequency, 12);
        assert_eq!(updated.next_dose, added.next_dose);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let service = service();
        assert!(matches!(
            service.take_medication("missing", now()).await,
            Err(MedicationServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.remove_medication("missing").await,
            Err(MedicationServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_storage_failure_maps_to_repository_error() {
        let mut repo = MockRepo::new();
        repo.expect_upsert()
            .returning(|_| Err(RepositoryError::Unavailable("disk full".to_string())));
        let service = MedicationService::new(repo);

        let result = service.add_medication(request("Paracetamol", 8), now()).await;
        assert!(matches!(result, Err(MedicationServiceError::Repository(_))));
    }

    #[tokio::test]
    async fn test_stored_frequency_out_of_range_is_rejected() {
        let mut repo = MockRepo::new();
        repo.expect_get_by_id().returning(|id| {
            Ok(Some(DataMedication {
                id: id.to_string(),
                name: "Paracetamol".to_string(),
                medication_type: "analgesic".to_string(),
                dose: "1g".to_string(),
                frequency: u32::MAX,
                schedule: None,
                last_taken: None,
                next_dose: None,
            }))
        });
        repo.expect_upsert().never();
        let service = MedicationService::new(repo);

        let result = service.take_medication("1", now()).await;
        assert!(matches!(result, Err(MedicationServiceError::Validation(_))));
    }
}
