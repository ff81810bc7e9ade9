use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::daily_record::DailyRecord;
use super::medication::{DoseCountdown, Medication};

/// History window relative to now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum TimeRange {
    #[serde(rename = "7days")]
    #[default]
    SevenDays,
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "90days")]
    NinetyDays,
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    /// Window length in days; `None` means no lower bound
    pub fn days(self) -> Option<i64> {
        match self {
            TimeRange::SevenDays => Some(7),
            TimeRange::ThirtyDays => Some(30),
            TimeRange::NinetyDays => Some(90),
            TimeRange::All => None,
        }
    }

    /// Earliest record date included by this range
    pub fn start(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|days| now - Duration::days(days))
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7days" => Ok(TimeRange::SevenDays),
            "30days" => Ok(TimeRange::ThirtyDays),
            "90days" => Ok(TimeRange::NinetyDays),
            "all" => Ok(TimeRange::All),
            other => Err(format!("Invalid time range: {}", other)),
        }
    }
}

/// One point of the pain evolution chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ChartPoint {
    /// `dd/MM` date label
    pub date: String,
    pub pain: f64,
}

/// Aggregates over a set of records
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RecordStats {
    pub total_records: usize,
    /// Mean intensity to one decimal, `None` without records
    pub average_pain: Option<f64>,
    /// Records with intensity below 5
    pub good_days: usize,
    /// Records with intensity of 6 or more
    pub bad_days: usize,
}

/// Filtered history with its chart series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub range: TimeRange,
    /// Newest first
    pub records: Vec<DailyRecord>,
    /// Oldest first
    pub chart: Vec<ChartPoint>,
    pub stats: RecordStats,
}

/// Overall emotional state label derived from PHQ-2 and GAD-2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum EmotionalStatus {
    #[serde(rename = "Bien")]
    Good,
    #[serde(rename = "Regular")]
    Fair,
    #[serde(rename = "Necesita atención")]
    NeedsAttention,
    #[serde(rename = "Sin datos")]
    NoData,
}

impl EmotionalStatus {
    pub fn label(self) -> &'static str {
        match self {
            EmotionalStatus::Good => "Bien",
            EmotionalStatus::Fair => "Regular",
            EmotionalStatus::NeedsAttention => "Necesita atención",
            EmotionalStatus::NoData => "Sin datos",
        }
    }
}

/// Emotional screening of the latest record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EmotionalSummary {
    pub status: EmotionalStatus,
    pub phq2_score: Option<u8>,
    pub gad2_score: Option<u8>,
    pub phq2_positive: bool,
    pub gad2_positive: bool,
}

/// The medication due soonest
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NextDose {
    pub medication: Medication,
    pub countdown: DoseCountdown,
}

/// Patient dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub average_pain_7_days: Option<f64>,
    pub stats: RecordStats,
    pub emotional: EmotionalSummary,
    pub last_record: Option<DailyRecord>,
    pub next_dose: Option<NextDose>,
    pub medication_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_range_wire_names() {
        assert_eq!("30days".parse::<TimeRange>().unwrap(), TimeRange::ThirtyDays);
        assert_eq!(serde_json::to_string(&TimeRange::All).unwrap(), "\"all\"");
        assert!("14days".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_range_start() {
        let now = Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap();
        assert_eq!(
            TimeRange::SevenDays.start(now),
            Some(Utc.with_ymd_and_hms(2024, 2, 3, 12, 0, 0).unwrap())
        );
        assert_eq!(TimeRange::All.start(now), None);
    }
}
