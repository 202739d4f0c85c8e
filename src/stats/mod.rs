//! Aggregation and recommendation rules
//!
//! Everything here is a pure function over log slices. Callers pass the
//! current instant so results are reproducible.

pub mod recommend;
pub mod report;
pub mod summary;
pub mod trend;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub use recommend::{bmr, recommend, BodyProfile, Recommendation, RecommendationReport, Sex};
pub use report::{weekly_report, Period, WeeklyReport};
pub use summary::{average_sleep_hours, statistics, SleepAverage, Statistics};
pub use trend::{daily_breakdown, exercise_trend, DailyTotals, ExerciseTrendPoint};

/// Parse the date part of a `tanggal` value.
///
/// Accepts `YYYY-MM-DD` and anything starting with it (`2025-01-09T00:00:00Z`).
pub fn parse_log_date(tanggal: &str) -> Option<NaiveDate> {
    let date = tanggal.split(['T', ' ']).next().unwrap_or(tanggal);
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

/// Parse a bed/wake timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Sum that saturates instead of overflowing
pub(crate) fn total<I: IntoIterator<Item = i64>>(values: I) -> i64 {
    values.into_iter().fold(0, i64::saturating_add)
}

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_saturates() {
        assert_eq!(total([250, 400, 125]), 775);
        assert_eq!(total([i64::MAX, i64::MAX, 1]), i64::MAX);
        assert_eq!(total(Vec::new()), 0);
    }

    #[test]
    fn test_parse_log_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 9);
        assert_eq!(parse_log_date("2025-01-09"), expected);
        assert_eq!(parse_log_date("2025-01-09T00:00:00.000Z"), expected);
        assert_eq!(parse_log_date("09/01/2025"), None);
        assert_eq!(parse_log_date(""), None);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let a = parse_timestamp("2025-01-01T22:30:00.000Z").unwrap();
        let b = parse_timestamp("2025-01-02T05:30:00+07:00").unwrap();
        let c = parse_timestamp("2025-01-01T22:30").unwrap();
        let d = parse_timestamp("2025-01-01 22:30:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, d);
        assert!(parse_timestamp("kemarin malam").is_none());
        assert!(parse_timestamp("  ").is_none());
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(7.25), 7.3);
        assert_eq!(round1(8.0), 8.0);
        assert_eq!(round1(7.04), 7.0);
    }
}
