//! Daily record wizard: draft store, step machine and session registry.

mod action;
mod error;
mod guard;
mod service;
mod session;
mod step;
mod store;

pub use action::StepAction;
pub use error::WizardError;
pub use guard::{continue_guard, GuardFailure};
pub use service::{WizardService, WizardServiceTrait};
pub use session::{WizardSession, WizardSnapshot};
pub use step::WizardStep;
pub use store::DraftStore;
