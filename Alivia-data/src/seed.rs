//! Historical records served by the mock backend when seeding is enabled.

use crate::models::daily_record::DailyRecord;

/// (date, intensity, primary area) of the mock history
const MOCK_HISTORY: [(&str, f64, &str); 5] = [
    ("2024-01-01", 5.0, "head"),
    ("2024-01-02", 6.0, "neck"),
    ("2024-01-03", 4.0, "back-upper"),
    ("2024-01-04", 5.0, "head"),
    ("2024-01-05", 7.0, "neck"),
];

/// Build the mock history as stored records
pub fn mock_daily_records() -> Vec<DailyRecord> {
    MOCK_HISTORY
        .iter()
        .enumerate()
        .map(|(idx, (date, intensity, area))| {
            let timestamp = format!("{}T09:00:00+00:00", date);
            let secondary: Vec<String> = ["head", "neck", "back-upper"]
                .iter()
                .filter(|a| *a != area)
                .map(|a| a.to_string())
                .collect();
            let mut areas = vec![area.to_string()];
            areas.extend(secondary.iter().cloned());
            let qualities = vec!["stabbing".to_string(), "burning".to_string()];
            let duration_value = (idx as u32 % 24) + 1;

            DailyRecord {
                id: format!("record-{}", idx),
                idempotency_key: None,
                primary_pain_area: area.to_string(),
                secondary_pain_areas: secondary,
                is_usual_place: true,
                pain_intensity: *intensity,
                pain_qualities: qualities.clone(),
                pain_quality_other: String::new(),
                duration_unit: "hours".to_string(),
                duration_value,
                has_had_before: Some(true),
                weekly_frequency: Some(3),
                functional_impact_physical: 4,
                functional_impact_work: 3,
                functional_impact_social: 2,
                phq2_answer1: Some(1),
                phq2_answer2: Some(0),
                gad2_answer1: Some(1),
                gad2_answer2: Some(1),
                took_medication: Some(false),
                medication_id: None,
                medication_relief: None,
                recommendation_category: None,
                recommendation_message: None,
                pain_areas: serde_json::to_string(&areas).unwrap_or_default(),
                pain_types: serde_json::to_string(&qualities).unwrap_or_default(),
                pain_duration_unit: "hours".to_string(),
                pain_duration_value: duration_value,
                date: timestamp.clone(),
                created_at: timestamp,
            }
        })
        .collect()
}
