pub mod dashboard;
pub mod daily_record;
pub mod emotional;
pub mod history;
pub mod medication;
pub mod pain_scale;
pub mod triage;

// Domain services
// Pure rules (triage, pain scale, screening, history) plus the async services built on them.

// Re-export service traits and factory functions
pub use daily_record::{
    create_default_daily_record_service, create_seeded_daily_record_service, DailyRecordServiceError,
    DailyRecordServiceTrait,
};
pub use dashboard::{DashboardService, DashboardServiceError, DashboardServiceTrait};
pub use medication::{
    create_default_medication_service, create_medication_service, time_until_next_dose,
    MedicationServiceError, MedicationServiceTrait,
};
pub use triage::compute_recommendation;

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use daily_record::create_mock_daily_record_service;
