//! Lifetime statistics over a user's logs

use serde::Serialize;

use super::{parse_timestamp, round1, total};
use crate::models::{ExerciseLog, FoodLog, SleepLog};

/// Totals shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_calories: i64,
    pub average_sleep_hours: f64,
    pub total_exercise_minutes: i64,
    pub total_calories_burned: i64,
    pub average_exercise_minutes: i64,
    pub total_exercise_sessions: usize,
    pub total_food_entries: usize,
    pub total_sleep_entries: usize,
    pub skipped_sleep_entries: usize,
}

/// Mean sleep duration and how many logs could not be measured
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SleepAverage {
    pub hours: f64,
    pub counted: usize,
    pub skipped: usize,
}

/// Hours between bed and wake time. `None` when either timestamp is
/// unparsable or waking precedes going to bed.
pub fn sleep_duration_hours(log: &SleepLog) -> Option<f64> {
    let bed = parse_timestamp(&log.waktu_tidur)?;
    let wake = parse_timestamp(&log.waktu_bangun)?;
    let seconds = (wake - bed).num_seconds();
    if seconds < 0 {
        return None;
    }
    Some(seconds as f64 / 3600.0)
}

/// Average over the logs that have a measurable duration, one decimal.
///
/// Unmeasurable logs are left out of the divisor and reported in `skipped`.
pub fn average_sleep_hours(logs: &[SleepLog]) -> SleepAverage {
    let durations: Vec<f64> = logs.iter().filter_map(sleep_duration_hours).collect();
    let skipped = logs.len() - durations.len();

    if durations.is_empty() {
        return SleepAverage {
            hours: 0.0,
            counted: 0,
            skipped,
        };
    }

    let total: f64 = durations.iter().sum();
    SleepAverage {
        hours: round1(total / durations.len() as f64),
        counted: durations.len(),
        skipped,
    }
}

/// Summarise a user's full history
pub fn statistics(food: &[FoodLog], exercise: &[ExerciseLog], sleep: &[SleepLog]) -> Statistics {
    let total_calories = total(food.iter().map(|l| l.kalori));
    let total_exercise_minutes = total(exercise.iter().map(|l| l.durasi_menit));
    let total_calories_burned = total(exercise.iter().map(|l| l.kalori_terbakar));

    let average_exercise_minutes = if exercise.is_empty() {
        0
    } else {
        (total_exercise_minutes as f64 / exercise.len() as f64).round() as i64
    };

    let sleep_avg = average_sleep_hours(sleep);

    Statistics {
        total_calories,
        average_sleep_hours: sleep_avg.hours,
        total_exercise_minutes,
        total_calories_burned,
        average_exercise_minutes,
        total_exercise_sessions: exercise.len(),
        total_food_entries: food.len(),
        total_sleep_entries: sleep.len(),
        skipped_sleep_entries: sleep_avg.skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sleep(bed: &str, wake: &str) -> SleepLog {
        SleepLog {
            id: 1,
            user_id: 1,
            tanggal: "2025-01-02".to_string(),
            waktu_tidur: bed.to_string(),
            waktu_bangun: wake.to_string(),
            kualitas_tidur: None,
            created_at: String::new(),
        }
    }

    fn food(kalori: i64) -> FoodLog {
        FoodLog {
            id: 1,
            user_id: 1,
            nama_makanan: "Nasi".to_string(),
            kalori,
            tanggal: "2025-01-02".to_string(),
            created_at: String::new(),
        }
    }

    fn exercise(menit: i64, kalori: i64) -> ExerciseLog {
        ExerciseLog {
            id: 1,
            user_id: 1,
            nama_olahraga: "Lari".to_string(),
            durasi_menit: menit,
            kalori_terbakar: kalori,
            tanggal: "2025-01-02".to_string(),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_empty_history_is_all_zero() {
        assert_eq!(statistics(&[], &[], &[]), Statistics::default());
        assert_eq!(average_sleep_hours(&[]).hours, 0.0);
    }

    #[test]
    fn test_single_eight_hour_sleep() {
        let avg = average_sleep_hours(&[sleep("2025-01-01T22:00:00Z", "2025-01-02T06:00:00Z")]);
        assert_eq!(avg.hours, 8.0);
        assert_eq!(avg.counted, 1);
        assert_eq!(avg.skipped, 0);
    }

    #[test]
    fn test_unparsable_sleep_is_excluded_from_divisor() {
        let logs = vec![
            sleep("2025-01-01T22:00:00Z", "2025-01-02T06:00:00Z"),
            sleep("2025-01-02T23:00:00Z", "2025-01-03T06:00:00Z"),
            sleep("", "2025-01-03T06:00:00Z"),
            sleep("2025-01-04T06:00:00Z", "2025-01-03T22:00:00Z"),
        ];
        let avg = average_sleep_hours(&logs);
        assert_eq!(avg.hours, 7.5);
        assert_eq!(avg.skipped, 2);

        let stats = statistics(&[], &[], &logs);
        assert_eq!(stats.total_sleep_entries, 4);
        assert_eq!(stats.skipped_sleep_entries, 2);
    }

    #[test]
    fn test_sums_are_exact() {
        let stats = statistics(
            &[food(250), food(400), food(125)],
            &[exercise(30, 300), exercise(45, 410)],
            &[],
        );
        assert_eq!(stats.total_calories, 775);
        assert_eq!(stats.total_calories_burned, 710);
        assert_eq!(stats.total_exercise_minutes, 75);
        assert_eq!(stats.average_exercise_minutes, 38);
        assert_eq!(stats.total_exercise_sessions, 2);
        assert_eq!(stats.total_food_entries, 3);
    }

    #[test]
    fn test_near_limit_values_do_not_overflow() {
        let stats = statistics(
            &[food(i64::MAX - 1), food(i64::MAX - 1)],
            &[exercise(i64::MAX, i64::MAX), exercise(10, 10)],
            &[],
        );
        assert_eq!(stats.total_calories, i64::MAX);
        assert_eq!(stats.total_exercise_minutes, i64::MAX);
        assert_eq!(stats.total_calories_burned, i64::MAX);
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(statistics(&[food(10)], &[], &[])).unwrap();
        assert_eq!(json["totalCalories"], 10);
        assert_eq!(json["averageSleepHours"], 0.0);
        assert_eq!(json["skippedSleepEntries"], 0);
    }
}
