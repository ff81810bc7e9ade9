//! Typed wizard commands and the draft patches they produce.

use serde::Deserialize;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::daily_record::{DailyRecordDraft, DraftPatch, DurationUnit};
use crate::services::pain_scale::{clamp_intensity, face_to_intensity, FACES};

use super::error::WizardError;

const MAX_WEEKLY_FREQUENCY: u8 = 7;
const MAX_IMPACT: u8 = 10;
const MAX_SCREENING_ANSWER: u8 = 3;
const MAX_RELIEF: u8 = 10;

/// A single user interaction with the wizard
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum StepAction {
    /// Select or deselect a body-map area
    ToggleArea {
        #[serde(rename = "areaId")]
        area_id: String,
    },
    SetUsualPlace { value: bool },
    SetIntensity { value: f64 },
    /// Tap a face of the scale by its anchor value
    SelectFace { anchor: u8 },
    ToggleQuality { tag: String },
    SetQualityOther { text: String },
    SetDurationUnit { unit: DurationUnit },
    SetDurationValue { value: u32 },
    SetHadBefore { value: bool },
    SetWeeklyFrequency { value: u8 },
    SetPhysicalImpact { value: u8 },
    SetWorkImpact { value: u8 },
    SetSocialImpact { value: u8 },
    /// Answer PHQ-2 question 1 or 2
    AnswerPhq2 { question: u8, value: u8 },
    /// Answer GAD-2 question 1 or 2
    AnswerGad2 { question: u8, value: u8 },
    SetTookMedication { value: bool },
    SelectMedication {
        #[serde(rename = "medicationId")]
        medication_id: String,
    },
    SetMedicationRelief { value: u8 },
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn screening_question(question: u8) -> Result<usize, WizardError> {
    match question {
        1 | 2 => Ok(usize::from(question)),
        other => Err(WizardError::InvalidAction(format!(
            "question must be 1 or 2, got {}",
            other
        ))),
    }
}

impl StepAction {
    /// Translate the action into a patch against `draft`, applying the
    /// clamping and dependent-field clearing rules.
    pub fn to_patch(&self, draft: &DailyRecordDraft) -> Result<DraftPatch, WizardError> {
        let mut patch = DraftPatch::default();

        match self {
            StepAction::ToggleArea { area_id } => {
                let area_id = area_id.trim();
                if area_id.is_empty() {
                    return Err(WizardError::InvalidAction("areaId must not be empty".to_string()));
                }
                if draft.primary_pain_area == area_id {
                    patch.primary_pain_area = Some(String::new());
                } else if draft.secondary_pain_areas.iter().any(|a| a == area_id) {
                    patch.secondary_pain_areas = Some(
                        draft
                            .secondary_pain_areas
                            .iter()
                            .filter(|a| *a != area_id)
                            .cloned()
                            .collect(),
                    );
                } else if draft.primary_pain_area.is_empty() {
                    patch.primary_pain_area = Some(area_id.to_string());
                } else {
                    let mut secondary = draft.secondary_pain_areas.clone();
                    secondary.push(area_id.to_string());
                    patch.secondary_pain_areas = Some(secondary);
                }
            }
            StepAction::SetUsualPlace { value } => patch.is_usual_place = Some(*value),
            StepAction::SetIntensity { value } => {
                patch.pain_intensity = Some(round_tenth(clamp_intensity(*value)));
            }
            StepAction::SelectFace { anchor } => {
                if !FACES.iter().any(|face| face.value == *anchor) {
                    return Err(WizardError::InvalidAction(format!("no face with value {}", anchor)));
                }
                patch.pain_intensity = Some(face_to_intensity(*anchor));
            }
            StepAction::ToggleQuality { tag } => {
                let tag = tag.trim();
                if tag.is_empty() {
                    return Err(WizardError::InvalidAction("tag must not be empty".to_string()));
                }
                let mut qualities = draft.pain_qualities.clone();
                if let Some(pos) = qualities.iter().position(|q| q == tag) {
                    qualities.remove(pos);
                } else {
                    qualities.push(tag.to_string());
                }
                patch.pain_qualities = Some(qualities);
            }
            StepAction::SetQualityOther { text } => patch.pain_quality_other = Some(text.clone()),
            StepAction::SetDurationUnit { unit } => {
                patch.duration_unit = Some(*unit);
                patch.duration_value = Some(1);
            }
            StepAction::SetDurationValue { value } => {
                patch.duration_value = Some((*value).clamp(1, draft.duration_unit.max_value()));
            }
            StepAction::SetHadBefore { value } => {
                patch.has_had_before = Some(Some(*value));
                if !*value {
                    patch.weekly_frequency = Some(None);
                }
            }
            StepAction::SetWeeklyFrequency { value } => {
                if draft.has_had_before != Some(true) {
                    return Err(WizardError::InvalidAction(
                        "weeklyFrequency requires hasHadBefore to be true".to_string(),
                    ));
                }
                patch.weekly_frequency = Some(Some((*value).min(MAX_WEEKLY_FREQUENCY)));
            }
            StepAction::SetPhysicalImpact { value } => {
                patch.functional_impact_physical = Some((*value).min(MAX_IMPACT));
            }
            StepAction::SetWorkImpact { value } => {
                patch.functional_impact_work = Some((*value).min(MAX_IMPACT));
            }
            StepAction::SetSocialImpact { value } => {
                patch.functional_impact_social = Some((*value).min(MAX_IMPACT));
            }
            StepAction::AnswerPhq2 { question, value } => {
                let answer = Some(Some((*value).min(MAX_SCREENING_ANSWER)));
                match screening_question(*question)? {
                    1 => patch.phq2_answer1 = answer,
                    _ => patch.phq2_answer2 = answer,
                }
            }
            StepAction::AnswerGad2 { question, value } => {
                let answer = Some(Some((*value).min(MAX_SCREENING_ANSWER)));
                match screening_question(*question)? {
                    1 => patch.gad2_answer1 = answer,
                    _ => patch.gad2_answer2 = answer,
                }
            }
            StepAction::SetTookMedication { value } => {
                patch.took_medication = Some(Some(*value));
                if !*value {
                    patch.medication_id = Some(None);
                    patch.medication_relief = Some(None);
                }
            }
            StepAction::SelectMedication { medication_id } => {
                if draft.took_medication != Some(true) {
                    return Err(WizardError::InvalidAction(
                        "medicationId requires tookMedication to be true".to_string(),
                    ));
                }
                patch.medication_id = Some(Some(medication_id.clone()));
            }
            StepAction::SetMedicationRelief { value } => {
                if draft.took_medication != Some(true) {
                    return Err(WizardError::InvalidAction(
                        "medicationRelief requires tookMedication to be true".to_string(),
                    ));
                }
                patch.medication_relief = Some(Some((*value).min(MAX_RELIEF)));
            }
        }

        Ok(patch)
    }
}
