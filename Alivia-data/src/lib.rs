// Alivia Data
// This crate handles record persistence and the key-value store behind the medication list

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;

// Historical records used to seed the mock backend
pub mod seed;
