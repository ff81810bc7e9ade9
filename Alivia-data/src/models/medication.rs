use serde::{Deserialize, Serialize};

/// Storage model for a medication in the persisted reminder list.
///
/// The serialized shape is the document kept under the `patient-medications` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,

    /// analgesic, antiinflammatory, muscle-relaxant or other
    #[serde(rename = "type")]
    pub medication_type: String,

    pub dose: String,

    /// Hours between doses
    pub frequency: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_taken: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_dose: Option<String>,
}
