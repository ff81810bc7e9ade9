//! Aggregations over stored daily records.

use chrono::{DateTime, Duration, Utc};

use crate::entities::daily_record::DailyRecord;
use crate::entities::history::{ChartPoint, HistoryView, RecordStats, TimeRange};

/// Intensity below which a day counts as good
pub const GOOD_DAY_MAX_INTENSITY: f64 = 5.0;

/// Intensity from which a day counts as bad
pub const BAD_DAY_MIN_INTENSITY: f64 = 6.0;

/// Records considered by the seven-day average
const AVERAGE_WINDOW: usize = 7;

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean_intensity<'a>(records: impl Iterator<Item = &'a DailyRecord>) -> Option<f64> {
    let (sum, count) = records.fold((0.0, 0usize), |(sum, count), r| {
        (sum + r.draft.pain_intensity, count + 1)
    });
    (count > 0).then(|| round_one_decimal(sum / count as f64))
}

/// Sort newest first
pub fn sort_newest_first(records: &mut [DailyRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Keep the records inside `range`, newest first
pub fn filter_range(mut records: Vec<DailyRecord>, range: TimeRange, now: DateTime<Utc>) -> Vec<DailyRecord> {
    if let Some(start) = range.start(now) {
        records.retain(|r| r.date >= start);
    }
    sort_newest_first(&mut records);
    records
}

/// Chart series, oldest first, for records given newest first
pub fn chart_series(records: &[DailyRecord]) -> Vec<ChartPoint> {
    records
        .iter()
        .rev()
        .map(|r| ChartPoint {
            date: r.date.format("%d/%m").to_string(),
            pain: r.draft.pain_intensity,
        })
        .collect()
}

pub fn compute_stats(records: &[DailyRecord]) -> RecordStats {
    RecordStats {
        total_records: records.len(),
        average_pain: mean_intensity(records.iter()),
        good_days: records
            .iter()
            .filter(|r| r.draft.pain_intensity < GOOD_DAY_MAX_INTENSITY)
            .count(),
        bad_days: records
            .iter()
            .filter(|r| r.draft.pain_intensity >= BAD_DAY_MIN_INTENSITY)
            .count(),
    }
}

/// Mean intensity of at most the seven most recent records of the last seven days.
/// `records` must be newest first.
pub fn average_pain_last_7_days(records: &[DailyRecord], now: DateTime<Utc>) -> Option<f64> {
    let start = now - Duration::days(7);
    mean_intensity(
        records
            .iter()
            .filter(|r| r.date >= start)
            .take(AVERAGE_WINDOW),
    )
}

/// Build the history view for a range
pub fn build_history(records: Vec<DailyRecord>, range: TimeRange, now: DateTime<Utc>) -> HistoryView {
    let records = filter_range(records, range, now);
    HistoryView {
        range,
        chart: chart_series(&records),
        stats: compute_stats(&records),
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::daily_record::DailyRecordDraft;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap()
    }

    fn record(days_ago: i64, intensity: f64) -> DailyRecord {
        let date = now() - Duration::days(days_ago);
        DailyRecord {
            id: format!("record-{}", days_ago),
            draft: DailyRecordDraft {
                pain_intensity: intensity,
                ..DailyRecordDraft::default()
            },
            date,
            created_at: date,
            idempotency_key: None,
        }
    }

    #[test]
    fn test_range_filtering() {
        let records = vec![record(40, 3.0), record(1, 6.0), record(100, 2.0), record(10, 5.0)];

        let last_week = filter_range(records.clone(), TimeRange::SevenDays, now());
        assert_eq!(last_week.len(), 1);

        let last_month = filter_range(records.clone(), TimeRange::ThirtyDays, now());
        let ids: Vec<&str> = last_month.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["record-1", "record-10"]);

        assert_eq!(filter_range(records.clone(), TimeRange::NinetyDays, now()).len(), 3);
        assert_eq!(filter_range(records, TimeRange::All, now()).len(), 4);
    }

    #[test]
    fn test_range_start_is_inclusive() {
        let records = vec![record(7, 4.0)];
        assert_eq!(filter_range(records, TimeRange::SevenDays, now()).len(), 1);
    }

    #[test]
    fn test_chart_is_oldest_first_with_day_month_labels() {
        let history = build_history(vec![record(1, 6.0), record(3, 4.0)], TimeRange::All, now());
        assert_eq!(history.chart[0].date, "28/03");
        assert_eq!(history.chart[0].pain, 4.0);
        assert_eq!(history.chart[1].date, "30/03");
        assert_eq!(history.records[0].id, "record-1");
    }

    #[test]
    fn test_stats() {
        let stats = compute_stats(&[record(1, 4.0), record(2, 5.0), record(3, 6.0), record(4, 7.5)]);
        assert_eq!(stats.total_records, 4);
        assert_eq!(stats.average_pain, Some(5.6));
        assert_eq!(stats.good_days, 1);
        assert_eq!(stats.bad_days, 2);
        assert_eq!(compute_stats(&[]).average_pain, None);
    }

    #[test]
    fn test_seven_day_average_caps_window() {
        let mut records: Vec<DailyRecord> = (0..7).map(|d| record(d, 2.0)).collect();
        records.push(record(0, 10.0));
        records.push(record(9, 10.0));
        sort_newest_first(&mut records);
        // eight records fall in the window; only the seven newest count
        let average = average_pain_last_7_days(&records, now()).unwrap();
        assert!(average < 10.0);
        assert_eq!(average_pain_last_7_days(&[record(9, 4.0)], now()), None);
    }
}
