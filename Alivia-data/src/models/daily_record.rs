use serde::{Deserialize, Serialize};

/// Storage model for a submitted daily pain record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    /// Opaque identifier (`record-<uuid>`)
    pub id: String,

    /// Client-minted key guarding against duplicate submissions
    pub idempotency_key: Option<String>,

    pub primary_pain_area: String,
    pub secondary_pain_areas: Vec<String>,
    pub is_usual_place: bool,

    /// Pain intensity in the stored domain [1.0, 10.0]
    pub pain_intensity: f64,

    pub pain_qualities: Vec<String>,
    pub pain_quality_other: String,

    /// Duration unit as its wire name (hours, days, weeks, months)
    pub duration_unit: String,
    pub duration_value: u32,
    pub has_had_before: Option<bool>,
    pub weekly_frequency: Option<u8>,

    pub functional_impact_physical: u8,
    pub functional_impact_work: u8,
    pub functional_impact_social: u8,

    pub phq2_answer1: Option<u8>,
    pub phq2_answer2: Option<u8>,
    pub gad2_answer1: Option<u8>,
    pub gad2_answer2: Option<u8>,

    pub took_medication: Option<bool>,
    pub medication_id: Option<String>,
    pub medication_relief: Option<u8>,

    /// Triage category as its wire name
    pub recommendation_category: Option<String>,
    pub recommendation_message: Option<String>,

    /// Legacy JSON-encoded `[primary, ...secondary]`
    pub pain_areas: String,

    /// Legacy JSON-encoded pain qualities
    pub pain_types: String,

    pub pain_duration_unit: String,
    pub pain_duration_value: u32,

    /// When the episode was recorded (RFC 3339)
    pub date: String,

    /// When the record was stored (RFC 3339)
    pub created_at: String,
}

/// Input data for storing a new daily record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDailyRecordRequest {
    pub idempotency_key: Option<String>,
    pub primary_pain_area: String,
    pub secondary_pain_areas: Vec<String>,
    pub is_usual_place: bool,
    pub pain_intensity: f64,
    pub pain_qualities: Vec<String>,
    pub pain_quality_other: String,
    pub duration_unit: String,
    pub duration_value: u32,
    pub has_had_before: Option<bool>,
    pub weekly_frequency: Option<u8>,
    pub functional_impact_physical: u8,
    pub functional_impact_work: u8,
    pub functional_impact_social: u8,
    pub phq2_answer1: Option<u8>,
    pub phq2_answer2: Option<u8>,
    pub gad2_answer1: Option<u8>,
    pub gad2_answer2: Option<u8>,
    pub took_medication: Option<bool>,
    pub medication_id: Option<String>,
    pub medication_relief: Option<u8>,
    pub recommendation_category: Option<String>,
    pub recommendation_message: Option<String>,
    pub pain_areas: String,
    pub pain_types: String,
    pub pain_duration_unit: String,
    pub pain_duration_value: u32,

    /// Episode date. Defaults to the storage time when absent.
    pub date: Option<String>,
}
