// Public entities for the Alivia API
// Wire shapes that differ from the domain entities

// Daily records as the patient client sends and reads them
pub mod daily_record;

// Remote triage request
pub mod recommendation;

// Wizard navigation requests
pub mod wizard;

// Error responses shared by every handler
pub mod common;
