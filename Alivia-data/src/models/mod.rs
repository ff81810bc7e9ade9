pub mod daily_record;
pub mod medication;
