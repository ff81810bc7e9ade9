use tracing::debug;

use crate::entities::daily_record::{DailyRecordDraft, DraftPatch};

/// Holds one session's draft
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftStore {
    draft: DailyRecordDraft,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current draft
    pub fn get_draft(&self) -> DailyRecordDraft {
        self.draft.clone()
    }

    pub fn draft(&self) -> &DailyRecordDraft {
        &self.draft
    }

    /// Shallow-merge `patch`. No cross-field rules are applied here.
    pub fn update_draft(&mut self, patch: DraftPatch) {
        patch.apply_to(&mut self.draft);
    }

    pub fn reset_draft(&mut self) {
        debug!("Resetting wizard draft");
        self.draft = DailyRecordDraft::default();
    }
}
