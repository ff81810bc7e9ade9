use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Dosing interval applied when a request leaves it out
pub const DEFAULT_FREQUENCY_HOURS: u32 = 8;

/// Medication class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum MedicationType {
    #[default]
    Analgesic,
    #[serde(rename = "antiinflammatory")]
    AntiInflammatory,
    MuscleRelaxant,
    Other,
}

impl MedicationType {
    pub fn as_str(self) -> &'static str {
        match self {
            MedicationType::Analgesic => "analgesic",
            MedicationType::AntiInflammatory => "antiinflammatory",
            MedicationType::MuscleRelaxant => "muscle-relaxant",
            MedicationType::Other => "other",
        }
    }
}

impl fmt::Display for MedicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MedicationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analgesic" => Ok(MedicationType::Analgesic),
            "antiinflammatory" => Ok(MedicationType::AntiInflammatory),
            "muscle-relaxant" => Ok(MedicationType::MuscleRelaxant),
            "other" => Ok(MedicationType::Other),
            other => Err(format!("Invalid medication type: {}", other)),
        }
    }
}

/// A medication the patient takes, with reminder times
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub medication_type: MedicationType,
    /// Free-text dose, e.g. "500mg"
    pub dose: String,
    /// Hours between doses
    pub frequency: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_taken: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_dose: Option<DateTime<Utc>>,
}

fn default_frequency() -> u32 {
    DEFAULT_FREQUENCY_HOURS
}

/// Request to add or edit a medication
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required and cannot exceed 100 characters"))]
    pub name: String,

    #[serde(rename = "type", default)]
    pub medication_type: MedicationType,

    #[validate(length(min = 1, max = 50, message = "Dose is required and cannot exceed 50 characters"))]
    pub dose: String,

    #[serde(default = "default_frequency")]
    #[validate(range(min = 1, max = 72, message = "Frequency must be between 1 and 72 hours"))]
    pub frequency: u32,

    #[serde(default)]
    #[validate(length(max = 200, message = "Schedule cannot exceed 200 characters"))]
    pub schedule: Option<String>,
}

/// Time left until a medication's next dose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DoseCountdown {
    /// The next dose time has passed
    Overdue,
    /// Whole hours and remaining minutes until the next dose
    Due { hours: i64, minutes: i64 },
}

/// Medication with its countdown, as listed to the patient
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MedicationReminder {
    #[serde(flatten)]
    pub medication: Medication,
    pub time_until_next_dose: Option<DoseCountdown>,
}
