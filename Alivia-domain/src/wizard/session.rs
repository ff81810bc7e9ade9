use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::daily_record::{DailyRecordDraft, DailyRecordSubmission, DraftPatch};
use crate::services::triage::compute_recommendation;

use super::action::StepAction;
use super::error::WizardError;
use super::guard::{continue_guard, GuardFailure};
use super::step::WizardStep;
use super::store::DraftStore;

/// Client-visible state of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub session_id: Uuid,
    pub step: WizardStep,
    /// One-based position of `step`
    pub step_number: usize,
    pub total_steps: usize,
    pub draft: DailyRecordDraft,
    /// Guard failure of the current step, if any
    pub guard: Option<GuardFailure>,
    pub submission_pending: bool,
    pub created_at: DateTime<Utc>,
}

/// One patient's pass through the wizard.
///
/// While a submission is pending every mutation is rejected, so the draft
/// handed to persistence cannot change underneath it.
#[derive(Debug, Clone)]
pub struct WizardSession {
    id: Uuid,
    step: WizardStep,
    store: DraftStore,
    pending: bool,
    idempotency_key: Option<String>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            step: WizardStep::FIRST,
            store: DraftStore::new(),
            pending: false,
            idempotency_key: None,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &DailyRecordDraft {
        self.store.draft()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Record that the patient used the session at `now`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    /// Whether the session has gone unused for `timeout`. A pending session never expires.
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        !self.pending && now - self.last_activity >= timeout
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            session_id: self.id,
            step: self.step,
            step_number: self.step.index() + 1,
            total_steps: WizardStep::ALL.len(),
            draft: self.store.get_draft(),
            guard: continue_guard(self.step, self.store.draft()).err(),
            submission_pending: self.pending,
            created_at: self.created_at,
        }
    }

    fn ensure_idle(&self) -> Result<(), WizardError> {
        if self.pending {
            Err(WizardError::SubmissionPending)
        } else {
            Ok(())
        }
    }

    /// Keep an already computed recommendation in line with the current answers
    fn refresh_recommendation(&mut self) {
        if self.store.draft().recommendation.is_some() {
            let recommendation = compute_recommendation(self.store.draft());
            self.store.update_draft(DraftPatch {
                recommendation: Some(Some(recommendation)),
                ..DraftPatch::default()
            });
        }
    }

    /// Merge a partial update into the draft
    pub fn update_draft(&mut self, patch: DraftPatch) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.store.update_draft(patch);
        self.refresh_recommendation();
        Ok(())
    }

    /// Apply a typed action to the draft
    pub fn apply(&mut self, action: &StepAction) -> Result<(), WizardError> {
        self.ensure_idle()?;
        let patch = action.to_patch(self.store.draft())?;
        self.store.update_draft(patch);
        self.refresh_recommendation();
        Ok(())
    }

    /// Move forward if the current step's guard passes
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_idle()?;

        let next = self.step.next().ok_or_else(|| {
            WizardError::InvalidTransition("the save step is terminal; submit the record instead".to_string())
        })?;

        continue_guard(self.step, self.store.draft()).map_err(|failure| WizardError::Guard {
            step: self.step,
            missing: failure.missing,
            message: failure.message,
        })?;

        if next == WizardStep::Recommendation {
            let recommendation = compute_recommendation(self.store.draft());
            debug!("Recommendation computed for session {}: {}", self.id, recommendation.category);
            self.store.update_draft(DraftPatch {
                recommendation: Some(Some(recommendation)),
                ..DraftPatch::default()
            });
        }

        self.step = next;
        Ok(next)
    }

    /// Move one step back; stays on the first step
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_idle()?;
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        Ok(self.step)
    }

    /// Jump back to an earlier step. Forward jumps would skip guards and are rejected.
    pub fn go_to(&mut self, step: WizardStep) -> Result<WizardStep, WizardError> {
        self.ensure_idle()?;
        if step > self.step {
            return Err(WizardError::InvalidTransition(format!(
                "cannot skip ahead from {} to {}",
                self.step, step
            )));
        }
        self.step = step;
        Ok(step)
    }

    /// Mark the session pending and hand out the submission.
    ///
    /// The idempotency key is minted on the first attempt and reused on retries.
    pub fn begin_submission(&mut self) -> Result<DailyRecordSubmission, WizardError> {
        self.ensure_idle()?;
        if self.step != WizardStep::Save {
            return Err(WizardError::InvalidTransition(format!(
                "records can only be submitted from the save step, current step is {}",
                self.step
            )));
        }

        let key = self
            .idempotency_key
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        self.pending = true;

        let mut draft = self.store.get_draft();
        if draft.recommendation.is_none() {
            draft.recommendation = Some(compute_recommendation(&draft));
        }

        Ok(DailyRecordSubmission {
            draft,
            idempotency_key: Some(key),
            date: None,
        })
    }

    /// Clear the pending flag. A successful submission resets the draft; a failed one keeps it.
    pub fn complete_submission(&mut self, succeeded: bool) {
        self.pending = false;
        if succeeded {
            self.store.reset_draft();
            self.idempotency_key = None;
            self.step = WizardStep::FIRST;
        }
    }

    /// Discard the draft and start over. Not allowed while a submission is pending.
    pub fn abandon(&mut self) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.store.reset_draft();
        self.idempotency_key = None;
        self.step = WizardStep::FIRST;
        Ok(())
    }
}
