//! Seven-day report window

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::parse_log_date;
use crate::models::{ExerciseLog, FoodLog, SleepLog};

/// Length of the report window in days
pub const WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    /// The window ending at `now`
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(WINDOW_DAYS),
            end: now,
        }
    }

    /// A log dated `tanggal` (midnight UTC) falls inside when it is not
    /// before the window start. Unparsable dates never match.
    pub fn contains(&self, tanggal: &str) -> bool {
        parse_log_date(tanggal)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .is_some_and(|midnight| midnight.and_utc() >= self.start)
    }
}

/// Logs of the last seven days
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub food_logs: Vec<FoodLog>,
    pub sleep_logs: Vec<SleepLog>,
    pub exercise_logs: Vec<ExerciseLog>,
    pub period: Period,
}

/// Keep the logs dated on or after `now - 7 days`.
///
/// There is no upper bound, so future-dated logs are kept.
pub fn weekly_report(
    food: &[FoodLog],
    exercise: &[ExerciseLog],
    sleep: &[SleepLog],
    now: DateTime<Utc>,
) -> WeeklyReport {
    let period = Period::ending_at(now);

    WeeklyReport {
        food_logs: food.iter().filter(|l| period.contains(&l.tanggal)).cloned().collect(),
        sleep_logs: sleep.iter().filter(|l| period.contains(&l.tanggal)).cloned().collect(),
        exercise_logs: exercise
            .iter()
            .filter(|l| period.contains(&l.tanggal))
            .cloned()
            .collect(),
        period,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn food(id: i64, tanggal: &str) -> FoodLog {
        FoodLog {
            id,
            user_id: 1,
            nama_makanan: "Nasi".to_string(),
            kalori: 100,
            tanggal: tanggal.to_string(),
            created_at: String::new(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_bounds() {
        let logs = vec![
            food(1, "2025-01-10"),
            food(2, "2025-01-04"),
            food(3, "2025-01-03"), // midnight is before 2025-01-03T12:00
            food(4, "2024-12-01"),
            food(5, "bukan tanggal"),
            food(6, "2025-02-01"),
        ];

        let report = weekly_report(&logs, &[], &[], now());
        let ids: Vec<_> = report.food_logs.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 6]);
        assert_eq!(report.period.end, now());
        assert_eq!(report.period.start, Utc.with_ymd_and_hms(2025, 1, 3, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_serializes_camel_case() {
        let report = weekly_report(&[], &[], &[], now());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["foodLogs"].as_array().unwrap().is_empty());
        assert!(json["exerciseLogs"].is_array());
        assert!(json["sleepLogs"].is_array());
        assert!(json["period"]["start"].is_string());
    }
}
