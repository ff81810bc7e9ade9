use serde::Deserialize;
use utoipa::ToSchema;

use alivia_domain::entities::daily_record::DEFAULT_PAIN_INTENSITY;
use alivia_domain::services::triage::TriageInput;

/// Request payload for the remote triage endpoint
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Defaults to 5 when absent
    pub pain_intensity: Option<f64>,

    /// Defaults to 0 when absent
    pub functional_impact_physical: Option<u8>,

    /// Informational, not used by the triage rules
    pub phq2_score: Option<u8>,

    /// Informational, not used by the triage rules
    pub gad2_score: Option<u8>,
}

impl RecommendationRequest {
    pub fn triage_input(&self) -> TriageInput {
        TriageInput {
            pain_intensity: self.pain_intensity.unwrap_or(DEFAULT_PAIN_INTENSITY),
            functional_impact_physical: self.functional_impact_physical.unwrap_or(0),
        }
    }
}
