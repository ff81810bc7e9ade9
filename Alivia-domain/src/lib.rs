// Alivia Domain
// This crate contains the business logic for the Alivia daily pain record service

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Daily record wizard
pub mod wizard;

// Health checks and system status
pub mod health;

// Re-export the storage layer for wiring from the API crate
pub use alivia_data::repository::{FileKeyValueStorage, InMemoryKeyValueStorage, KeyValueStorage};

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
