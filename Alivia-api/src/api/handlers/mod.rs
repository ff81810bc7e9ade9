pub mod daily_record;
pub mod dashboard;
pub mod health;
pub mod medication;
pub mod pain_scale;
pub mod recommendation;
pub mod wizard;

// Re-export handlers for easier imports
pub use daily_record::{create_daily_record, get_daily_record, get_daily_records, get_pain_quality_tags};
pub use dashboard::get_dashboard;
pub use health::health_check;
pub use medication::{add_medication, list_medications, remove_medication, take_medication, update_medication};
pub use pain_scale::{get_pain_faces, get_pain_scale};
pub use recommendation::create_recommendation;
