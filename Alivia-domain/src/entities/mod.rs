pub mod conversions;
pub mod daily_record;
pub mod history;
pub mod medication;

// Re-export common types for easier imports
pub use daily_record::{
    DailyRecord, DailyRecordDraft, DailyRecordSubmission, DraftPatch, DurationUnit, Recommendation,
    TriageCategory, PAIN_QUALITY_TAGS,
};
pub use history::{
    ChartPoint, DashboardSummary, EmotionalStatus, EmotionalSummary, HistoryView, NextDose,
    RecordStats, TimeRange,
};
pub use medication::{DoseCountdown, Medication, MedicationReminder, MedicationRequest, MedicationType};
