// Repository module structure
pub mod errors;
mod daily_record;
mod in_memory;
mod medication;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use daily_record::{build_record, DailyRecordRepository, DailyRecordRepositoryTrait};
pub use medication::{MedicationRepository, MedicationRepositoryTrait, MEDICATIONS_KEY};
pub use storage::{FileKeyValueStorage, InMemoryKeyValueStorage, KeyValueStorage};

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use daily_record::tests;
