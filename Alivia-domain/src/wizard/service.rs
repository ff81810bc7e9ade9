use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entities::daily_record::{DailyRecord, DraftPatch};
use crate::services::daily_record::DailyRecordServiceTrait;
use crate::services::medication::MedicationServiceTrait;

use super::action::StepAction;
use super::error::WizardError;
use super::session::{WizardSession, WizardSnapshot};
use super::step::WizardStep;

/// Trait for wizard session operations
#[async_trait]
pub trait WizardServiceTrait {
    async fn create_session(&self) -> WizardSnapshot;

    async fn get_session(&self, id: Uuid) -> Result<WizardSnapshot, WizardError>;

    async fn update_draft(&self, id: Uuid, patch: DraftPatch) -> Result<WizardSnapshot, WizardError>;

    async fn apply_action(&self, id: Uuid, action: StepAction) -> Result<WizardSnapshot, WizardError>;

    /// Guarded forward navigation
    async fn continue_step(&self, id: Uuid) -> Result<WizardSnapshot, WizardError>;

    /// Unguarded backward navigation
    async fn back(&self, id: Uuid) -> Result<WizardSnapshot, WizardError>;

    /// Unguarded jump to an earlier step
    async fn go_to(&self, id: Uuid, step: WizardStep) -> Result<WizardSnapshot, WizardError>;

    /// Submit the session's record. The session ends on success.
    async fn submit(&self, id: Uuid) -> Result<DailyRecord, WizardError>;

    /// Reset and discard a session
    async fn abandon(&self, id: Uuid) -> Result<(), WizardError>;
}

/// Sessions unused for this long are dropped from the registry
pub const DEFAULT_SESSION_IDLE_TIMEOUT_MINUTES: i64 = 120;

/// In-memory registry of wizard sessions
pub struct WizardService {
    sessions: Mutex<HashMap<Uuid, WizardSession>>,
    records: Arc<dyn DailyRecordServiceTrait + Send + Sync>,
    medications: Arc<dyn MedicationServiceTrait + Send + Sync>,
    idle_timeout: Duration,
}

impl WizardService {
    pub fn new(
        records: Arc<dyn DailyRecordServiceTrait + Send + Sync>,
        medications: Arc<dyn MedicationServiceTrait + Send + Sync>,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            records,
            medications,
            idle_timeout: Duration::minutes(DEFAULT_SESSION_IDLE_TIMEOUT_MINUTES),
        }
    }

    /// Override how long an unused session is kept
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Drop sessions that have been idle past the timeout
    fn evict_idle(&self, sessions: &mut HashMap<Uuid, WizardSession>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.idle_timeout));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle wizard session(s)", evicted);
        }
    }

    /// Run `f` against a session under the registry lock
    async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut WizardSession) -> Result<T, WizardError> + Send,
    ) -> Result<T, WizardError> {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        self.evict_idle(&mut sessions, now);
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| WizardError::SessionNotFound(id.to_string()))?;
        session.touch(now);
        f(session)
    }

    async fn snapshot_after(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut WizardSession) -> Result<(), WizardError> + Send,
    ) -> Result<WizardSnapshot, WizardError> {
        self.with_session(id, |session| {
            f(session)?;
            Ok(session.snapshot())
        })
        .await
    }
}

#[async_trait]
impl WizardServiceTrait for WizardService {
    async fn create_session(&self) -> WizardSnapshot {
        let session = WizardSession::new();
        let snapshot = session.snapshot();
        let mut sessions = self.sessions.lock().await;
        self.evict_idle(&mut sessions, session.last_activity());
        sessions.insert(session.id(), session);
        drop(sessions);
        info!("Wizard session created: {}", snapshot.session_id);
        snapshot
    }

    async fn get_session(&self, id: Uuid) -> Result<WizardSnapshot, WizardError> {
        self.with_session(id, |session| Ok(session.snapshot())).await
    }

    async fn update_draft(&self, id: Uuid, patch: DraftPatch) -> Result<WizardSnapshot, WizardError> {
        self.snapshot_after(id, |session| session.update_draft(patch)).await
    }

    async fn apply_action(&self, id: Uuid, action: StepAction) -> Result<WizardSnapshot, WizardError> {
        if let StepAction::SelectMedication { medication_id } = &action {
            let medications = self.medications.list_medications().await?;
            if !medications.iter().any(|m| &m.id == medication_id) {
                return Err(WizardError::InvalidAction(format!(
                    "unknown medication: {}",
                    medication_id
                )));
            }
        }
        self.snapshot_after(id, |session| session.apply(&action)).await
    }

    async fn continue_step(&self, id: Uuid) -> Result<WizardSnapshot, WizardError> {
        self.snapshot_after(id, |session| session.advance().map(|_| ())).await
    }

    async fn back(&self, id: Uuid) -> Result<WizardSnapshot, WizardError> {
        self.snapshot_after(id, |session| session.back().map(|_| ())).await
    }

    async fn go_to(&self, id: Uuid, step: WizardStep) -> Result<WizardSnapshot, WizardError> {
        self.snapshot_after(id, |session| session.go_to(step).map(|_| ())).await
    }

    async fn submit(&self, id: Uuid) -> Result<DailyRecord, WizardError> {
        let submission = self.with_session(id, |session| session.begin_submission()).await?;

        // The lock is released while persisting; the pending flag rejects concurrent mutation
        let result = self.records.submit(submission).await;

        let mut sessions = self.sessions.lock().await;
        match result {
            Ok(record) => {
                if let Some(mut session) = sessions.remove(&id) {
                    session.complete_submission(true);
                }
                info!("Wizard session {} submitted record {}", id, record.id);
                Ok(record)
            }
            Err(e) => {
                if let Some(session) = sessions.get_mut(&id) {
                    session.complete_submission(false);
                }
                warn!("Wizard session {} submission failed: {}", id, e);
                Err(WizardError::Submission(e))
            }
        }
    }

    async fn abandon(&self, id: Uuid) -> Result<(), WizardError> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .get_mut(&id)
            .ok_or_else(|| WizardError::SessionNotFound(id.to_string()))?
            .abandon()?;
        sessions.remove(&id);
        info!("Wizard session abandoned: {}", id);
        Ok(())
    }
}
