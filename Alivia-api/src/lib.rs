// Alivia API lib.rs
//
// HTTP surface of the Alivia daily pain record service.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
