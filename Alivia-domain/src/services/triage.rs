//! Care pathway recommendation for a pain record.
//!
//! The same function backs the wizard's recommendation step and the remote
//! recommendation endpoint, so both always agree.

use crate::entities::daily_record::{DailyRecordDraft, Recommendation, TriageCategory};

/// Intensity at or above which the patient is sent to the emergency department
pub const URGENCIA_MIN_INTENSITY: f64 = 8.0;

/// Intensity at or above which SAPU or the SAR hotline is recommended
pub const SAPU_SAR_MIN_INTENSITY: f64 = 6.0;

/// Intensity at or above which a CESFAM/CCR visit is recommended
pub const CESFAM_CCR_MIN_INTENSITY: f64 = 4.0;

/// Physical impact at or above which a CESFAM/CCR visit is recommended
pub const CESFAM_CCR_MIN_PHYSICAL_IMPACT: u8 = 6;

/// Inputs read by the triage rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriageInput {
    pub pain_intensity: f64,
    pub functional_impact_physical: u8,
}

impl From<&DailyRecordDraft> for TriageInput {
    fn from(draft: &DailyRecordDraft) -> Self {
        Self {
            pain_intensity: draft.pain_intensity,
            functional_impact_physical: draft.functional_impact_physical,
        }
    }
}

/// Patient-facing text for a category
pub fn message_for(category: TriageCategory) -> &'static str {
    match category {
        TriageCategory::Urgencia => {
            "El dolor es muy intenso. Se recomienda acudir a urgencia hospitalaria para evaluación inmediata."
        }
        TriageCategory::SapuSar => {
            "El dolor es moderado a severo. Se recomienda consultar en SAPU o llamar al SAR (600 360 7777) para evaluación."
        }
        TriageCategory::CesfamCcr => {
            "Se recomienda programar una consulta en CESFAM o CCR para evaluación y seguimiento."
        }
        TriageCategory::Autocuidado => {
            "El dolor es leve. Puedes manejarlo con autocuidado, pero si persiste o empeora, consulta con tu médico."
        }
    }
}

/// Pick the care pathway. Rules are checked in order and the first match wins.
pub fn categorize(input: TriageInput) -> TriageCategory {
    if input.pain_intensity >= URGENCIA_MIN_INTENSITY {
        TriageCategory::Urgencia
    } else if input.pain_intensity >= SAPU_SAR_MIN_INTENSITY {
        TriageCategory::SapuSar
    } else if input.pain_intensity >= CESFAM_CCR_MIN_INTENSITY
        || input.functional_impact_physical >= CESFAM_CCR_MIN_PHYSICAL_IMPACT
    {
        TriageCategory::CesfamCcr
    } else {
        TriageCategory::Autocuidado
    }
}

/// Compute the recommendation for triage inputs
pub fn recommend(input: TriageInput) -> Recommendation {
    let category = categorize(input);
    Recommendation {
        category,
        message: message_for(category).to_string(),
    }
}

/// Compute the recommendation for a draft
pub fn compute_recommendation(draft: &DailyRecordDraft) -> Recommendation {
    recommend(TriageInput::from(draft))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(pain_intensity: f64, functional_impact_physical: u8) -> TriageInput {
        TriageInput {
            pain_intensity,
            functional_impact_physical,
        }
    }

    #[test]
    fn test_boundaries() {
        let cases = [
            (4.0, 0, TriageCategory::CesfamCcr),
            (3.9, 6, TriageCategory::CesfamCcr),
            (3.9, 5, TriageCategory::Autocuidado),
            (5.9, 0, TriageCategory::CesfamCcr),
            (6.0, 0, TriageCategory::SapuSar),
            (7.9, 0, TriageCategory::SapuSar),
            (8.0, 0, TriageCategory::Urgencia),
            (1.0, 0, TriageCategory::Autocuidado),
        ];
        for (intensity, physical, expected) in cases {
            assert_eq!(
                categorize(input(intensity, physical)),
                expected,
                "intensity {} physical {}",
                intensity,
                physical
            );
        }
    }

    #[test]
    fn test_physical_impact_never_escalates_past_cesfam() {
        assert_eq!(categorize(input(1.0, 10)), TriageCategory::CesfamCcr);
        assert_eq!(categorize(input(6.5, 10)), TriageCategory::SapuSar);
    }

    #[test]
    fn test_monotonic_in_intensity() {
        let steps = [3.9, 4.0, 5.9, 6.0, 7.9, 8.0, 10.0];
        for physical in [0u8, 6, 10] {
            let categories: Vec<TriageCategory> =
                steps.iter().map(|v| categorize(input(*v, physical))).collect();
            assert!(categories.windows(2).all(|w| w[0] <= w[1]), "{:?}", categories);
        }
    }

    #[test]
    fn test_idempotent() {
        let draft = DailyRecordDraft {
            pain_intensity: 7.2,
            functional_impact_physical: 2,
            ..DailyRecordDraft::default()
        };
        assert_eq!(compute_recommendation(&draft), compute_recommendation(&draft));
    }

    #[test]
    fn test_reference_scenarios() {
        let severe = DailyRecordDraft {
            primary_pain_area: "back-lower".to_string(),
            pain_intensity: 8.5,
            functional_impact_physical: 3,
            ..DailyRecordDraft::default()
        };
        let recommendation = compute_recommendation(&severe);
        assert_eq!(recommendation.category, TriageCategory::Urgencia);
        assert!(recommendation.message.contains("urgencia hospitalaria"));

        let limiting = DailyRecordDraft {
            pain_intensity: 3.0,
            functional_impact_physical: 7,
            ..DailyRecordDraft::default()
        };
        assert_eq!(compute_recommendation(&limiting).category, TriageCategory::CesfamCcr);
    }

    #[test]
    fn test_sapu_message_names_the_hotline() {
        assert!(message_for(TriageCategory::SapuSar).contains("600 360 7777"));
    }
}
