use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryFutureExt;
use thiserror::Error;
use tracing::debug;

use crate::entities::history::{DashboardSummary, NextDose};
use crate::entities::medication::Medication;
use crate::services::daily_record::{DailyRecordServiceError, DailyRecordServiceTrait};
use crate::services::medication::{time_until_next_dose, MedicationServiceError, MedicationServiceTrait};
use crate::services::{emotional, history};

/// Dashboard service errors
#[derive(Debug, Error)]
pub enum DashboardServiceError {
    #[error(transparent)]
    Records(#[from] DailyRecordServiceError),

    #[error(transparent)]
    Medications(#[from] MedicationServiceError),
}

#[async_trait]
pub trait DashboardServiceTrait {
    /// Summary of pain, emotional state and medication at `now`
    async fn get_summary(&self, now: DateTime<Utc>) -> Result<DashboardSummary, DashboardServiceError>;
}

/// Medication with the earliest scheduled dose
pub fn next_dose(medications: &[Medication], now: DateTime<Utc>) -> Option<NextDose> {
    let medication = medications
        .iter()
        .filter(|m| m.next_dose.is_some())
        .min_by_key(|m| m.next_dose)?;

    time_until_next_dose(medication, now).map(|countdown| NextDose {
        medication: medication.clone(),
        countdown,
    })
}

/// Dashboard assembled from the record and medication services
pub struct DashboardService {
    records: Arc<dyn DailyRecordServiceTrait + Send + Sync>,
    medications: Arc<dyn MedicationServiceTrait + Send + Sync>,
}

impl DashboardService {
    pub fn new(
        records: Arc<dyn DailyRecordServiceTrait + Send + Sync>,
        medications: Arc<dyn MedicationServiceTrait + Send + Sync>,
    ) -> Self {
        Self { records, medications }
    }
}

#[async_trait]
impl DashboardServiceTrait for DashboardService {
    async fn get_summary(&self, now: DateTime<Utc>) -> Result<DashboardSummary, DashboardServiceError> {
        let (records, medications) = futures::try_join!(
            self.records.get_all_records().map_err(DashboardServiceError::from),
            self.medications.list_medications().map_err(DashboardServiceError::from),
        )?;
        debug!(
            "Building dashboard from {} records and {} medications",
            records.len(),
            medications.len()
        );

        Ok(DashboardSummary {
            average_pain_7_days: history::average_pain_last_7_days(&records, now),
            stats: history::compute_stats(&records),
            emotional: emotional::summarize(records.first()),
            last_record: records.first().cloned(),
            next_dose: next_dose(&medications, now),
            medication_count: medications.len(),
        })
    }
}
