use chrono::{DateTime, Utc};

use alivia_data::models::daily_record as data_record;
use alivia_data::models::medication as data_medication;

use crate::entities::daily_record::{
    DailyRecord, DailyRecordDraft, DailyRecordSubmission, Recommendation, TriageCategory,
};
use crate::entities::medication::{Medication, MedicationType};
use crate::services::triage::message_for;

/// Conversion functions between domain entities and data models.
/// Names follow the pattern convert_to_[target_layer]_[model_name].

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("Invalid timestamp format: {}", value))
}

/// Convert a submission into the data layer create request, filling the legacy fields
pub fn convert_to_data_create_request(
    submission: &DailyRecordSubmission,
) -> data_record::CreateDailyRecordRequest {
    let draft = &submission.draft;
    let pain_areas = serde_json::to_string(&draft.all_pain_areas()).unwrap_or_else(|_| "[]".to_string());
    let pain_types = serde_json::to_string(&draft.pain_qualities).unwrap_or_else(|_| "[]".to_string());

    data_record::CreateDailyRecordRequest {
        idempotency_key: submission.idempotency_key.clone(),
        primary_pain_area: draft.primary_pain_area.clone(),
        secondary_pain_areas: draft.secondary_pain_areas.clone(),
        is_usual_place: draft.is_usual_place,
        pain_intensity: draft.pain_intensity,
        pain_qualities: draft.pain_qualities.clone(),
        pain_quality_other: draft.pain_quality_other.clone(),
        duration_unit: draft.duration_unit.as_str().to_string(),
        duration_value: draft.duration_value,
        has_had_before: draft.has_had_before,
        weekly_frequency: draft.weekly_frequency,
        functional_impact_physical: draft.functional_impact_physical,
        functional_impact_work: draft.functional_impact_work,
        functional_impact_social: draft.functional_impact_social,
        phq2_answer1: draft.phq2_answer1,
        phq2_answer2: draft.phq2_answer2,
        gad2_answer1: draft.gad2_answer1,
        gad2_answer2: draft.gad2_answer2,
        took_medication: draft.took_medication,
        medication_id: draft.medication_id.clone(),
        medication_relief: draft.medication_relief,
        recommendation_category: draft
            .recommendation
            .as_ref()
            .map(|r| r.category.as_str().to_string()),
        recommendation_message: draft.recommendation.as_ref().map(|r| r.message.clone()),
        pain_areas,
        pain_types,
        pain_duration_unit: draft.duration_unit.as_str().to_string(),
        pain_duration_value: draft.duration_value,
        date: submission.date.map(|d| d.to_rfc3339()),
    }
}

/// Convert a stored record into the domain entity
pub fn convert_to_domain_record(data: data_record::DailyRecord) -> Result<DailyRecord, String> {
    let duration_unit = data.duration_unit.parse()?;
    let date = parse_timestamp(&data.date)?;
    let created_at = parse_timestamp(&data.created_at)?;

    let recommendation = match data.recommendation_category.as_deref() {
        Some(category) => {
            let category: TriageCategory = category.parse()?;
            Some(Recommendation {
                category,
                message: data
                    .recommendation_message
                    .unwrap_or_else(|| message_for(category).to_string()),
            })
        }
        None => None,
    };

    Ok(DailyRecord {
        id: data.id,
        draft: DailyRecordDraft {
            primary_pain_area: data.primary_pain_area,
            secondary_pain_areas: data.secondary_pain_areas,
            is_usual_place: data.is_usual_place,
            pain_intensity: data.pain_intensity,
            pain_qualities: data.pain_qualities,
            pain_quality_other: data.pain_quality_other,
            duration_unit,
            duration_value: data.duration_value,
            has_had_before: data.has_had_before,
            weekly_frequency: data.weekly_frequency,
            functional_impact_physical: data.functional_impact_physical,
            functional_impact_work: data.functional_impact_work,
            functional_impact_social: data.functional_impact_social,
            phq2_answer1: data.phq2_answer1,
            phq2_answer2: data.phq2_answer2,
            gad2_answer1: data.gad2_answer1,
            gad2_answer2: data.gad2_answer2,
            took_medication: data.took_medication,
            medication_id: data.medication_id,
            medication_relief: data.medication_relief,
            recommendation,
        },
        date,
        created_at,
        idempotency_key: data.idempotency_key,
    })
}

/// Convert a persisted medication into the domain entity.
///
/// The list is written by older clients too, so unknown types map to `Other`
/// and unreadable dose times are dropped rather than failing the whole list.
pub fn convert_to_domain_medication(data: data_medication::Medication) -> Medication {
    Medication {
        id: data.id,
        name: data.name,
        medication_type: data.medication_type.parse().unwrap_or(MedicationType::Other),
        dose: data.dose,
        frequency: data.frequency,
        schedule: data.schedule,
        last_taken: data.last_taken.as_deref().and_then(|v| parse_timestamp(v).ok()),
        next_dose: data.next_dose.as_deref().and_then(|v| parse_timestamp(v).ok()),
    }
}

/// Convert a domain medication into its persisted shape
pub fn convert_to_data_medication(medication: &Medication) -> data_medication::Medication {
    data_medication::Medication {
        id: medication.id.clone(),
        name: medication.name.clone(),
        medication_type: medication.medication_type.as_str().to_string(),
        dose: medication.dose.clone(),
        frequency: medication.frequency,
        schedule: medication.schedule.clone(),
        last_taken: medication.last_taken.map(|d| d.to_rfc3339()),
        next_dose: medication.next_dose.map(|d| d.to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::daily_record::DurationUnit;

    fn submission() -> DailyRecordSubmission {
        DailyRecordSubmission {
            draft: DailyRecordDraft {
                primary_pain_area: "back-lower".to_string(),
                secondary_pain_areas: vec!["hip-left".to_string(), "knee-left".to_string()],
                pain_intensity: 6.5,
                pain_qualities: vec!["burning".to_string(), "sharp".to_string()],
                duration_unit: DurationUnit::Days,
                duration_value: 4,
                recommendation: Some(Recommendation {
                    category: TriageCategory::SapuSar,
                    message: message_for(TriageCategory::SapuSar).to_string(),
                }),
                ..DailyRecordDraft::default()
            },
            idempotency_key: Some("key-9".to_string()),
            date: None,
        }
    }

    #[test]
    fn test_create_request_carries_legacy_fields() {
        let request = convert_to_data_create_request(&submission());
        assert_eq!(request.pain_areas, r#"["back-lower","hip-left","knee-left"]"#);
        assert_eq!(request.pain_types, r#"["burning","sharp"]"#);
        assert_eq!(request.pain_duration_unit, "days");
        assert_eq!(request.pain_duration_value, 4);
        assert_eq!(request.recommendation_category.as_deref(), Some("sapu-sar"));
        assert_eq!(request.idempotency_key.as_deref(), Some("key-9"));
        assert_eq!(request.date, None);
    }

    #[test]
    fn test_stored_record_converts_back() {
        let stored = alivia_data::repository::build_record(convert_to_data_create_request(&submission()));
        let record = convert_to_domain_record(stored.clone()).unwrap();

        assert_eq!(record.id, stored.id);
        assert_eq!(record.draft, submission().draft);
        assert_eq!(record.idempotency_key.as_deref(), Some("key-9"));
    }

    #[test]
    fn test_missing_message_uses_engine_text() {
        let mut stored = alivia_data::repository::build_record(convert_to_data_create_request(&submission()));
        stored.recommendation_message = None;
        let record = convert_to_domain_record(stored).unwrap();
        assert_eq!(
            record.draft.recommendation.unwrap().message,
            message_for(TriageCategory::SapuSar)
        );
    }

    #[test]
    fn test_bad_stored_unit_is_rejected() {
        let mut stored = alivia_data::repository::build_record(convert_to_data_create_request(&submission()));
        stored.duration_unit = "fortnights".to_string();
        assert!(convert_to_domain_record(stored).is_err());
    }

    #[test]
    fn test_medication_conversion_is_lenient() {
        let data = data_medication::Medication {
            id: "1".to_string(),
            name: "Tramadol".to_string(),
            medication_type: "opioid".to_string(),
            dose: "50mg".to_string(),
            frequency: 12,
            schedule: None,
            last_taken: Some("yesterday".to_string()),
            next_dose: Some("2024-01-01T08:00:00.000Z".to_string()),
        };
        let medication = convert_to_domain_medication(data);
        assert_eq!(medication.medication_type, MedicationType::Other);
        assert_eq!(medication.last_taken, None);
        assert!(medication.next_dose.is_some());

        let back = convert_to_data_medication(&medication);
        assert_eq!(back.medication_type, "other");
        assert_eq!(back.next_dose.as_deref(), Some("2024-01-01T08:00:00+00:00"));
    }
}
