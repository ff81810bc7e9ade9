use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::medication::Medication;
use super::errors::RepositoryError;
use super::storage::KeyValueStorage;

/// Storage key of the medication list document
pub const MEDICATIONS_KEY: &str = "patient-medications";

/// Repository trait for the persisted medication list
#[async_trait]
pub trait MedicationRepositoryTrait {
    /// Load the full list for display. An unreadable or corrupt document yields an empty list.
    async fn list(&self) -> Result<Vec<Medication>, RepositoryError>;

    /// Get a medication by ID
    async fn get_by_id(&self, id: &str) -> Result<Option<Medication>, RepositoryError>;

    /// Insert or replace a medication, keeping list order for replacements.
    /// Fails without writing when the stored list cannot be read.
    async fn upsert(&self, medication: Medication) -> Result<Medication, RepositoryError>;

    /// Remove a medication. Returns `false` when no medication had that ID.
    async fn remove(&self, id: &str) -> Result<bool, RepositoryError>;
}

/// Medication list stored as a single JSON document in a key-value storage
#[derive(Debug, Clone)]
pub struct MedicationRepository {
    storage: Arc<dyn KeyValueStorage>,
}

impl MedicationRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    fn parse_document(document: &str) -> Vec<Medication> {
        match serde_json::from_str::<Vec<Medication>>(document) {
            Ok(medications) => medications,
            Err(e) => {
                warn!("Medication list is not valid JSON, using an empty list: {}", e);
                Vec::new()
            }
        }
    }

    /// Load the list before a write. Storage errors propagate so a failed read
    /// never turns into an overwrite; a corrupt document is replaced.
    async fn load_for_write(&self) -> Result<Vec<Medication>, RepositoryError> {
        Ok(self
            .storage
            .get_item(MEDICATIONS_KEY)
            .await?
            .map(|document| Self::parse_document(&document))
            .unwrap_or_default())
    }

    async fn save_all(&self, medications: &[Medication]) -> Result<(), RepositoryError> {
        let document = serde_json::to_string(medications)?;
        self.storage.set_item(MEDICATIONS_KEY, &document).await?;
        debug!("Saved {} medications", medications.len());
        Ok(())
    }
}

#[async_trait]
impl MedicationRepositoryTrait for MedicationRepository {
    async fn list(&self) -> Result<Vec<Medication>, RepositoryError> {
        match self.storage.get_item(MEDICATIONS_KEY).await {
            Ok(Some(document)) => Ok(Self::parse_document(&document)),
            Ok(None) => Ok(Vec::new()),
            Err(e) => {
                warn!("Could not read medication list, using an empty list: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Medication>, RepositoryError> {
        let medications = self.list().await?;
        Ok(medications.into_iter().find(|m| m.id == id))
    }

    async fn upsert(&self, medication: Medication) -> Result<Medication, RepositoryError> {
        let mut medications = self.load_for_write().await?;
        match medications.iter_mut().find(|m| m.id == medication.id) {
            Some(existing) => *existing = medication.clone(),
            None => medications.push(medication.clone()),
        }
        self.save_all(&medications).await?;
        Ok(medication)
    }

    async fn remove(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut medications = self.load_for_write().await?;
        let before = medications.len();
        medications.retain(|m| m.id != id);
        if medications.len() == before {
            return Ok(false);
        }
        self.save_all(&medications).await?;
        Ok(true)
    }
}
