//! PHQ-2 / GAD-2 screening scores.

use crate::entities::daily_record::{DailyRecord, DailyRecordDraft};
use crate::entities::history::{EmotionalStatus, EmotionalSummary};

/// Score at which a two-item screener is considered positive
pub const SCREENING_POSITIVE_SCORE: u8 = 3;

/// Answers of both screeners
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmotionalScreening {
    pub phq2: [Option<u8>; 2],
    pub gad2: [Option<u8>; 2],
}

impl EmotionalScreening {
    pub fn from_draft(draft: &DailyRecordDraft) -> Self {
        Self {
            phq2: [draft.phq2_answer1, draft.phq2_answer2],
            gad2: [draft.gad2_answer1, draft.gad2_answer2],
        }
    }

    /// Unanswered items count as 0
    pub fn phq2_score(&self) -> u8 {
        self.phq2.iter().flatten().sum()
    }

    pub fn gad2_score(&self) -> u8 {
        self.gad2.iter().flatten().sum()
    }

    pub fn total(&self) -> u8 {
        self.phq2_score() + self.gad2_score()
    }

    pub fn is_complete(&self) -> bool {
        self.phq2.iter().chain(self.gad2.iter()).all(Option::is_some)
    }

    pub fn status(&self) -> EmotionalStatus {
        match self.total() {
            0..=2 => EmotionalStatus::Good,
            3..=4 => EmotionalStatus::Fair,
            _ => EmotionalStatus::NeedsAttention,
        }
    }
}

/// Summarize the emotional state of the latest record
pub fn summarize(latest: Option<&DailyRecord>) -> EmotionalSummary {
    match latest {
        Some(record) => {
            let screening = EmotionalScreening::from_draft(&record.draft);
            EmotionalSummary {
                status: screening.status(),
                phq2_score: Some(screening.phq2_score()),
                gad2_score: Some(screening.gad2_score()),
                phq2_positive: screening.phq2_score() >= SCREENING_POSITIVE_SCORE,
                gad2_positive: screening.gad2_score() >= SCREENING_POSITIVE_SCORE,
            }
        }
        None => EmotionalSummary {
            status: EmotionalStatus::NoData,
            phq2_score: None,
            gad2_score: None,
            phq2_positive: false,
            gad2_positive: false,
        },
    }
}
