use serde::Serialize;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::daily_record::DailyRecordDraft;

use super::step::WizardStep;

pub const LOCATION_MESSAGE: &str =
    "Por favor, selecciona al menos una zona principal donde sientes dolor";
pub const EMOTIONAL_STATE_MESSAGE: &str = "Por favor, responde todas las preguntas";
pub const TOOK_MEDICATION_MESSAGE: &str = "Por favor, indica si tomaste medicación";
pub const MEDICATION_ID_MESSAGE: &str = "Por favor, selecciona el medicamento que tomaste";
pub const MEDICATION_RELIEF_MESSAGE: &str = "Por favor, indica cuánto alivió el medicamento";

/// Why the wizard cannot leave a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct GuardFailure {
    /// Wire names of the unanswered fields
    pub missing: Vec<&'static str>,
    /// Message shown to the patient
    pub message: &'static str,
}

fn missing_if_none<T>(value: &Option<T>, name: &'static str, missing: &mut Vec<&'static str>) {
    if value.is_none() {
        missing.push(name);
    }
}

/// Check whether `draft` allows continuing past `step`
pub fn continue_guard(step: WizardStep, draft: &DailyRecordDraft) -> Result<(), GuardFailure> {
    match step {
        WizardStep::Location => {
            if draft.primary_pain_area.is_empty() {
                return Err(GuardFailure {
                    missing: vec!["primaryPainArea"],
                    message: LOCATION_MESSAGE,
                });
            }
        }
        WizardStep::EmotionalState => {
            let mut missing = Vec::new();
            missing_if_none(&draft.phq2_answer1, "phq2Answer1", &mut missing);
            missing_if_none(&draft.phq2_answer2, "phq2Answer2", &mut missing);
            missing_if_none(&draft.gad2_answer1, "gad2Answer1", &mut missing);
            missing_if_none(&draft.gad2_answer2, "gad2Answer2", &mut missing);
            if !missing.is_empty() {
                return Err(GuardFailure {
                    missing,
                    message: EMOTIONAL_STATE_MESSAGE,
                });
            }
        }
        WizardStep::Medication => match draft.took_medication {
            None => {
                return Err(GuardFailure {
                    missing: vec!["tookMedication"],
                    message: TOOK_MEDICATION_MESSAGE,
                });
            }
            Some(true) => {
                let mut missing = Vec::new();
                missing_if_none(&draft.medication_id, "medicationId", &mut missing);
                missing_if_none(&draft.medication_relief, "medicationRelief", &mut missing);
                if let Some(first) = missing.first() {
                    let message = if *first == "medicationId" {
                        MEDICATION_ID_MESSAGE
                    } else {
                        MEDICATION_RELIEF_MESSAGE
                    };
                    return Err(GuardFailure { missing, message });
                }
            }
            Some(false) => {}
        },
        WizardStep::Intensity
        | WizardStep::Quality
        | WizardStep::Duration
        | WizardStep::FunctionalImpact
        | WizardStep::Recommendation
        | WizardStep::Save => {}
    }
    Ok(())
}
