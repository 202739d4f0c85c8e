//! Per-day aggregation of the report window

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use super::report::WeeklyReport;
use super::summary::sleep_duration_hours;
use super::{parse_log_date, round1, total};
use crate::models::ExerciseLog;

/// Totals for one calendar day
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyTotals {
    pub tanggal: String,
    pub hari: String,
    pub kalori_masuk: i64,
    pub kalori_terbakar: i64,
    pub menit_olahraga: i64,
    pub sesi_olahraga: i64,
    pub jam_tidur: f64,
}

/// Exercise totals for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseTrendPoint {
    pub tanggal: String,
    pub hari: String,
    pub sesi_olahraga: i64,
    pub menit_olahraga: i64,
    pub kalori_terbakar: i64,
}

fn day_name(date: &NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

/// Normalised `YYYY-MM-DD` key, or `None` for unparsable dates
fn day_key(tanggal: &str) -> Option<(String, &'static str)> {
    parse_log_date(tanggal).map(|d| (d.format("%Y-%m-%d").to_string(), day_name(&d)))
}

fn day_entry<'a>(
    by_date: &'a mut BTreeMap<String, DailyTotals>,
    tanggal: &str,
) -> Option<&'a mut DailyTotals> {
    let (key, hari) = day_key(tanggal)?;
    Some(by_date.entry(key.clone()).or_insert_with(|| DailyTotals {
        tanggal: key,
        hari: hari.to_string(),
        ..Default::default()
    }))
}

/// Group the windowed logs by day, oldest first
pub fn daily_breakdown(report: &WeeklyReport) -> Vec<DailyTotals> {
    let mut by_date: BTreeMap<String, DailyTotals> = BTreeMap::new();

    for log in &report.food_logs {
        if let Some(day) = day_entry(&mut by_date, &log.tanggal) {
            day.kalori_masuk = day.kalori_masuk.saturating_add(log.kalori);
        }
    }

    for log in &report.exercise_logs {
        if let Some(day) = day_entry(&mut by_date, &log.tanggal) {
            day.kalori_terbakar = day.kalori_terbakar.saturating_add(log.kalori_terbakar);
            day.menit_olahraga = day.menit_olahraga.saturating_add(log.durasi_menit);
            day.sesi_olahraga += 1;
        }
    }

    for log in &report.sleep_logs {
        if let Some(day) = day_entry(&mut by_date, &log.tanggal) {
            day.jam_tidur += sleep_duration_hours(log).unwrap_or(0.0);
        }
    }

    by_date
        .into_values()
        .map(|mut day| {
            day.jam_tidur = round1(day.jam_tidur);
            day
        })
        .collect()
}

/// Days with at least one exercise session, oldest first
pub fn exercise_trend(logs: &[ExerciseLog]) -> Vec<ExerciseTrendPoint> {
    let mut by_date: BTreeMap<String, Vec<&ExerciseLog>> = BTreeMap::new();

    for log in logs {
        if let Some((key, _)) = day_key(&log.tanggal) {
            by_date.entry(key).or_default().push(log);
        }
    }

    by_date
        .into_iter()
        .map(|(tanggal, sessions)| {
            let hari = parse_log_date(&tanggal).map(|d| day_name(&d)).unwrap_or("---");
            ExerciseTrendPoint {
                hari: hari.to_string(),
                sesi_olahraga: sessions.len() as i64,
                menit_olahraga: total(sessions.iter().map(|l| l.durasi_menit)),
                kalori_terbakar: total(sessions.iter().map(|l| l.kalori_terbakar)),
                tanggal,
            }
        })
        .collect()
}
