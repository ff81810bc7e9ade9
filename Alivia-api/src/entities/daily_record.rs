use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use alivia_domain::entities::{
    ChartPoint, DailyRecord, DailyRecordDraft, HistoryView, RecordStats, TimeRange,
};

/// Request payload for submitting a daily record.
///
/// The client also sends the legacy `painAreas`, `painTypes` and
/// `painDuration*` duplicates and a client-side `recommendation`. They are
/// accepted and ignored: the server derives both from the draft fields.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDailyRecordRequest {
    #[serde(flatten)]
    pub draft: DailyRecordDraft,

    /// When the episode happened. Defaults to the storage time.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// Alternative to the `Idempotency-Key` header
    #[serde(default)]
    pub idempotency_key: Option<String>,

    #[serde(default)]
    pub pain_areas: Option<String>,

    #[serde(default)]
    pub pain_types: Option<String>,

    #[serde(default)]
    pub pain_duration_unit: Option<String>,

    #[serde(default)]
    pub pain_duration_value: Option<u32>,
}

/// Public representation of a stored daily record, legacy fields included
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicDailyRecord {
    #[serde(flatten)]
    pub record: DailyRecord,

    /// JSON-encoded `[primary, ...secondary]`
    pub pain_areas: String,

    /// JSON-encoded pain qualities
    pub pain_types: String,

    pub pain_duration_unit: String,

    pub pain_duration_value: u32,
}

impl From<DailyRecord> for PublicDailyRecord {
    fn from(record: DailyRecord) -> Self {
        let draft = &record.draft;
        let pain_areas = json_array(&draft.all_pain_areas());
        let pain_types = json_array(&draft.pain_qualities);
        let pain_duration_unit = draft.duration_unit.as_str().to_string();
        let pain_duration_value = draft.duration_value;

        Self {
            record,
            pain_areas,
            pain_types,
            pain_duration_unit,
            pain_duration_value,
        }
    }
}

fn json_array(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Record history response
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub range: TimeRange,
    /// Newest first
    pub records: Vec<PublicDailyRecord>,
    /// Oldest first, `dd/MM` labels
    pub chart: Vec<ChartPoint>,
    pub stats: RecordStats,
}

impl From<HistoryView> for HistoryResponse {
    fn from(view: HistoryView) -> Self {
        Self {
            range: view.range,
            records: view.records.into_iter().map(PublicDailyRecord::from).collect(),
            chart: view.chart,
            stats: view.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_accepts_client_payload() {
        let request: CreateDailyRecordRequest = serde_json::from_value(json!({
            "primaryPainArea": "back-lower",
            "secondaryPainAreas": ["neck"],
            "isUsualPlace": true,
            "painIntensity": 7.5,
            "painQualities": ["burning"],
            "painQualityOther": "",
            "durationUnit": "days",
            "durationValue": 3,
            "hasHadBefore": false,
            "weeklyFrequency": null,
            "functionalImpactPhysical": 4,
            "functionalImpactWork": 2,
            "functionalImpactSocial": 1,
            "phq2Answer1": 1,
            "phq2Answer2": 0,
            "gad2Answer1": 2,
            "gad2Answer2": 1,
            "tookMedication": false,
            "medicationId": null,
            "medicationRelief": null,
            "recommendation": { "category": "sapu-sar", "message": "..." },
            "painAreas": "[\"back-lower\",\"neck\"]",
            "painTypes": "[\"burning\"]",
            "painDurationUnit": "days",
            "painDurationValue": 3
        }))
        .unwrap();

        assert_eq!(request.draft.primary_pain_area, "back-lower");
        assert_eq!(request.draft.secondary_pain_areas, vec!["neck".to_string()]);
        assert_eq!(request.draft.pain_intensity, 7.5);
        assert_eq!(request.draft.gad2_answer1, Some(2));
        assert_eq!(request.pain_duration_value, Some(3));
        assert!(request.idempotency_key.is_none());
    }

    #[test]
    fn test_request_fills_missing_fields_with_defaults() {
        let request: CreateDailyRecordRequest =
            serde_json::from_value(json!({ "primaryPainArea": "head" })).unwrap();
        let expected = DailyRecordDraft {
            primary_pain_area: "head".to_string(),
            ..DailyRecordDraft::default()
        };
        assert_eq!(request.draft, expected);
    }
}
