use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Default stored pain intensity for a fresh draft
pub const DEFAULT_PAIN_INTENSITY: f64 = 5.0;

/// Pain quality tags offered by the quality step
pub const PAIN_QUALITY_TAGS: [&str; 8] = [
    "electric", "cold", "stabbing", "burning", "throbbing", "aching", "pressure", "sharp",
];

/// Unit in which the patient reports how long the pain has lasted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Hours,
    Days,
    Weeks,
    Months,
}

impl DurationUnit {
    /// Largest duration value selectable for this unit
    pub fn max_value(self) -> u32 {
        match self {
            DurationUnit::Hours => 24,
            DurationUnit::Days => 30,
            DurationUnit::Weeks => 52,
            DurationUnit::Months => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DurationUnit::Hours => "hours",
            DurationUnit::Days => "days",
            DurationUnit::Weeks => "weeks",
            DurationUnit::Months => "months",
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hours" => Ok(DurationUnit::Hours),
            "days" => Ok(DurationUnit::Days),
            "weeks" => Ok(DurationUnit::Weeks),
            "months" => Ok(DurationUnit::Months),
            other => Err(format!("Invalid duration unit: {}", other)),
        }
    }
}

/// Care pathway chosen by the triage engine.
///
/// Variants are declared in increasing severity, so `Ord` compares severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum TriageCategory {
    /// Mild pain, self-care
    Autocuidado,
    /// Schedule a primary-care (CESFAM) or community rehab (CCR) visit
    CesfamCcr,
    /// Primary urgent care (SAPU) or the SAR hotline
    SapuSar,
    /// Hospital emergency department
    Urgencia,
}

impl TriageCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TriageCategory::Autocuidado => "autocuidado",
            TriageCategory::CesfamCcr => "cesfam-ccr",
            TriageCategory::SapuSar => "sapu-sar",
            TriageCategory::Urgencia => "urgencia",
        }
    }

    /// Heading shown above the recommendation
    pub fn title(self) -> &'static str {
        match self {
            TriageCategory::Autocuidado => "Autocuidado",
            TriageCategory::CesfamCcr => "CESFAM / CCR",
            TriageCategory::SapuSar => "SAPU / SAR",
            TriageCategory::Urgencia => "Urgencia",
        }
    }
}

impl fmt::Display for TriageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriageCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "autocuidado" => Ok(TriageCategory::Autocuidado),
            "cesfam-ccr" => Ok(TriageCategory::CesfamCcr),
            "sapu-sar" => Ok(TriageCategory::SapuSar),
            "urgencia" => Ok(TriageCategory::Urgencia),
            other => Err(format!("Invalid triage category: {}", other)),
        }
    }
}

/// Output of the triage engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Recommendation {
    pub category: TriageCategory,
    pub message: String,
}

/// The in-progress answers of one daily pain record wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct DailyRecordDraft {
    /// Body-map area id; empty when unset
    #[validate(length(max = 64, message = "Pain area ids cannot exceed 64 characters"))]
    pub primary_pain_area: String,

    /// Additional areas, never containing the primary area
    pub secondary_pain_areas: Vec<String>,

    pub is_usual_place: bool,

    #[validate(range(min = 0.0, max = 10.0, message = "Pain intensity must be between 0 and 10"))]
    pub pain_intensity: f64,

    pub pain_qualities: Vec<String>,

    #[validate(length(max = 500, message = "Pain quality description cannot exceed 500 characters"))]
    pub pain_quality_other: String,

    pub duration_unit: DurationUnit,

    #[validate(range(min = 1, message = "Duration must be at least 1"))]
    pub duration_value: u32,

    pub has_had_before: Option<bool>,

    #[validate(range(max = 7, message = "Weekly frequency must be between 0 and 7"))]
    pub weekly_frequency: Option<u8>,

    #[validate(range(max = 10, message = "Physical impact must be between 0 and 10"))]
    pub functional_impact_physical: u8,

    #[validate(range(max = 10, message = "Work impact must be between 0 and 10"))]
    pub functional_impact_work: u8,

    #[validate(range(max = 10, message = "Social impact must be between 0 and 10"))]
    pub functional_impact_social: u8,

    #[validate(range(max = 3, message = "PHQ-2 answers must be between 0 and 3"))]
    pub phq2_answer1: Option<u8>,

    #[validate(range(max = 3, message = "PHQ-2 answers must be between 0 and 3"))]
    pub phq2_answer2: Option<u8>,

    #[validate(range(max = 3, message = "GAD-2 answers must be between 0 and 3"))]
    pub gad2_answer1: Option<u8>,

    #[validate(range(max = 3, message = "GAD-2 answers must be between 0 and 3"))]
    pub gad2_answer2: Option<u8>,

    pub took_medication: Option<bool>,

    pub medication_id: Option<String>,

    #[validate(range(max = 10, message = "Medication relief must be between 0 and 10"))]
    pub medication_relief: Option<u8>,

    /// Computed by the triage engine, never entered by the patient
    pub recommendation: Option<Recommendation>,
}

impl Default for DailyRecordDraft {
    fn default() -> Self {
        Self {
            primary_pain_area: String::new(),
            secondary_pain_areas: Vec::new(),
            is_usual_place: false,
            pain_intensity: DEFAULT_PAIN_INTENSITY,
            pain_qualities: Vec::new(),
            pain_quality_other: String::new(),
            duration_unit: DurationUnit::Hours,
            duration_value: 1,
            has_had_before: None,
            weekly_frequency: None,
            functional_impact_physical: 0,
            functional_impact_work: 0,
            functional_impact_social: 0,
            phq2_answer1: None,
            phq2_answer2: None,
            gad2_answer1: None,
            gad2_answer2: None,
            took_medication: None,
            medication_id: None,
            medication_relief: None,
            recommendation: None,
        }
    }
}

impl DailyRecordDraft {
    /// Primary area followed by the secondary areas, skipping an unset primary
    pub fn all_pain_areas(&self) -> Vec<String> {
        let mut areas = Vec::with_capacity(1 + self.secondary_pain_areas.len());
        if !self.primary_pain_area.is_empty() {
            areas.push(self.primary_pain_area.clone());
        }
        areas.extend(self.secondary_pain_areas.iter().cloned());
        areas
    }

    /// Check the cross-field rules that field-level validation cannot express
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if !self.primary_pain_area.is_empty()
            && self.secondary_pain_areas.contains(&self.primary_pain_area)
        {
            problems.push("secondaryPainAreas: must not contain the primary area".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        if !self.secondary_pain_areas.iter().all(|a| seen.insert(a)) {
            problems.push("secondaryPainAreas: duplicate areas".to_string());
        }

        let max = self.duration_unit.max_value();
        if self.duration_value > max {
            problems.push(format!(
                "durationValue: must be at most {} {}",
                max, self.duration_unit
            ));
        }

        if self.weekly_frequency.is_some() && self.has_had_before != Some(true) {
            problems.push("weeklyFrequency: only allowed when hasHadBefore is true".to_string());
        }

        if self.took_medication != Some(true)
            && (self.medication_id.is_some() || self.medication_relief.is_some())
        {
            problems.push(
                "medicationId, medicationRelief: only allowed when tookMedication is true".to_string(),
            );
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }
}

/// Deserialize a field that distinguishes "absent" from "explicitly null".
///
/// Absent fields fall back to `None` through `#[serde(default)]`; a present field,
/// null or not, becomes `Some(..)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Strongly-typed partial update of a [`DailyRecordDraft`].
///
/// Only `Some` fields are written. Nullable draft fields use a nested option:
/// `Some(None)` clears the field, `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DraftPatch {
    pub primary_pain_area: Option<String>,
    pub secondary_pain_areas: Option<Vec<String>>,
    pub is_usual_place: Option<bool>,
    pub pain_intensity: Option<f64>,
    pub pain_qualities: Option<Vec<String>>,
    pub pain_quality_other: Option<String>,
    pub duration_unit: Option<DurationUnit>,
    pub duration_value: Option<u32>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "with-api", schema(value_type = Option<bool>))]
    pub has_had_before: Option<Option<bool>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "with-api", schema(value_type = Option<u8>))]
    pub weekly_frequency: Option<Option<u8>>,
    pub functional_impact_physical: Option<u8>,
    pub functional_impact_work: Option<u8>,
    pub functional_impact_social: Option<u8>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "with-api", schema(value_type = Option<u8>))]
    pub phq2_answer1: Option<Option<u8>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "with-api", schema(value_type = Option<u8>))]
    pub phq2_answer2: Option<Option<u8>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "with-api", schema(value_type = Option<u8>))]
    pub gad2_answer1: Option<Option<u8>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "with-api", schema(value_type = Option<u8>))]
    pub gad2_answer2: Option<Option<u8>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "with-api", schema(value_type = Option<bool>))]
    pub took_medication: Option<Option<bool>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "with-api", schema(value_type = Option<String>))]
    pub medication_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "with-api", schema(value_type = Option<u8>))]
    pub medication_relief: Option<Option<u8>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "with-api", schema(value_type = Option<Recommendation>))]
    pub recommendation: Option<Option<Recommendation>>,
}

impl DraftPatch {
    /// Shallow-merge the supplied fields into `draft`
    pub fn apply_to(self, draft: &mut DailyRecordDraft) {
        if let Some(v) = self.primary_pain_area {
            draft.primary_pain_area = v;
        }
        if let Some(v) = self.secondary_pain_areas {
            draft.secondary_pain_areas = v;
        }
        if let Some(v) = self.is_usual_place {
            draft.is_usual_place = v;
        }
        if let Some(v) = self.pain_intensity {
            draft.pain_intensity = v;
        }
        if let Some(v) = self.pain_qualities {
            draft.pain_qualities = v;
        }
        if let Some(v) = self.pain_quality_other {
            draft.pain_quality_other = v;
        }
        if let Some(v) = self.duration_unit {
            draft.duration_unit = v;
        }
        if let Some(v) = self.duration_value {
            draft.duration_value = v;
        }
        if let Some(v) = self.has_had_before {
            draft.has_had_before = v;
        }
        if let Some(v) = self.weekly_frequency {
            draft.weekly_frequency = v;
        }
        if let Some(v) = self.functional_impact_physical {
            draft.functional_impact_physical = v;
        }
        if let Some(v) = self.functional_impact_work {
            draft.functional_impact_work = v;
        }
        if let Some(v) = self.functional_impact_social {
            draft.functional_impact_social = v;
        }
        if let Some(v) = self.phq2_answer1 {
            draft.phq2_answer1 = v;
        }
        if let Some(v) = self.phq2_answer2 {
            draft.phq2_answer2 = v;
        }
        if let Some(v) = self.gad2_answer1 {
            draft.gad2_answer1 = v;
        }
        if let Some(v) = self.gad2_answer2 {
            draft.gad2_answer2 = v;
        }
        if let Some(v) = self.took_medication {
            draft.took_medication = v;
        }
        if let Some(v) = self.medication_id {
            draft.medication_id = v;
        }
        if let Some(v) = self.medication_relief {
            draft.medication_relief = v;
        }
        if let Some(v) = self.recommendation {
            draft.recommendation = v;
        }
    }

    /// Whether the patch writes any field the triage engine reads
    pub fn touches_triage_inputs(&self) -> bool {
        self.pain_intensity.is_some()
            || self.functional_impact_physical.is_some()
            || self.phq2_answer1.is_some()
            || self.phq2_answer2.is_some()
            || self.gad2_answer1.is_some()
            || self.gad2_answer2.is_some()
    }
}

/// A completed draft handed to the persistence collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecordSubmission {
    pub draft: DailyRecordDraft,

    /// Client-minted key making retries of the same submission safe
    pub idempotency_key: Option<String>,

    /// Episode date; the storage time is used when absent
    pub date: Option<DateTime<Utc>>,
}

/// A stored daily record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    /// Opaque record identifier
    pub id: String,

    #[serde(flatten)]
    pub draft: DailyRecordDraft,

    /// When the episode was recorded
    pub date: DateTime<Utc>,

    /// When the record was stored
    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl DailyRecord {
    /// PHQ-2 plus GAD-2 total of this record
    pub fn emotional_total(&self) -> u8 {
        crate::services::emotional::EmotionalScreening::from_draft(&self.draft).total()
    }
}
