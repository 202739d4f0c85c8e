//! BMR and daily calorie recommendations

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{parse_log_date, total};
use crate::models::{ExerciseLog, FoodLog};

/// BMR used when the profile is incomplete
pub const DEFAULT_BMR: f64 = 2000.0;

/// Width of the "balanced" band around the BMR, in kcal
const BALANCE_MARGIN: f64 = 300.0;

/// Burned calories above this earn a congratulation
const HIGH_ACTIVITY_KCAL: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Parse the free-text `jenis_kelamin` field
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pria" | "laki-laki" | "male" | "l" => Some(Sex::Male),
            "wanita" | "perempuan" | "female" | "p" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// The body measurements BMR needs
#[derive(Debug, Clone, Default)]
pub struct BodyProfile {
    pub tinggi_badan: Option<f64>,
    pub berat_badan: Option<f64>,
    pub tanggal_lahir: Option<String>,
    pub jenis_kelamin: Option<String>,
}

/// Whole years between `birth` and `today`; `None` for future dates
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Harris-Benedict BMR, or exactly [`DEFAULT_BMR`] if any input is missing
pub fn bmr(profile: &BodyProfile, today: NaiveDate) -> f64 {
    let height = profile.tinggi_badan.filter(|h| *h > 0.0);
    let weight = profile.berat_badan.filter(|w| *w > 0.0);
    let age = profile
        .tanggal_lahir
        .as_deref()
        .and_then(parse_log_date)
        .and_then(|birth| age_on(birth, today));
    let sex = profile.jenis_kelamin.as_deref().and_then(Sex::parse);

    match (height, weight, age, sex) {
        (Some(cm), Some(kg), Some(age), Some(sex)) => harris_benedict(sex, kg, cm, age as f64),
        _ => DEFAULT_BMR,
    }
}

fn harris_benedict(sex: Sex, kg: f64, cm: f64, age: f64) -> f64 {
    match sex {
        Sex::Male => 88.362 + 13.397 * kg + 4.799 * cm - 5.677 * age,
        Sex::Female => 447.593 + 9.247 * kg + 3.098 * cm - 4.330 * age,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub message: String,
}

impl Recommendation {
    fn new(kind: RecommendationType, message: String) -> Self {
        Self { kind, message }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieSummary {
    pub kalori_masuk: i64,
    pub kalori_keluar: i64,
    pub kebutuhan_dasar: i64,
    pub kalori_bersih: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub summary: CalorieSummary,
    pub recommendations: Vec<Recommendation>,
}

/// Build today's recommendations. Logs dated other than `today` are ignored.
pub fn recommend(
    food: &[FoodLog],
    exercise: &[ExerciseLog],
    profile: &BodyProfile,
    today: NaiveDate,
) -> RecommendationReport {
    let is_today = |tanggal: &str| parse_log_date(tanggal) == Some(today);

    let kalori_masuk = total(food.iter().filter(|l| is_today(&l.tanggal)).map(|l| l.kalori));
    let kalori_keluar = total(
        exercise
            .iter()
            .filter(|l| is_today(&l.tanggal))
            .map(|l| l.kalori_terbakar),
    );
    let kalori_bersih = kalori_masuk.saturating_sub(kalori_keluar);
    let base = bmr(profile, today);

    let mut recommendations = Vec::new();

    let net = kalori_bersih as f64;
    if net > base + BALANCE_MARGIN {
        recommendations.push(Recommendation::new(
            RecommendationType::Warning,
            format!(
                "Asupan kalori Anda hari ini ({} kkal) terlihat lebih tinggi \
                 dari kebutuhan dasar Anda. \
                 Pertimbangkan aktivitas ringan untuk menyeimbangkannya.",
                kalori_masuk
            ),
        ));
    } else if net < base - BALANCE_MARGIN {
        recommendations.push(Recommendation::new(
            RecommendationType::Info,
            format!(
                "Energi Anda penting! Asupan kalori Anda ({} kkal) lebih rendah \
                 dari kebutuhan dasar. Pastikan Anda makan cukup.",
                kalori_masuk
            ),
        ));
    } else {
        recommendations.push(Recommendation::new(
            RecommendationType::Success,
            "Kerja bagus! Keseimbangan kalori Anda hari ini sudah cukup baik.".to_string(),
        ));
    }

    if kalori_keluar == 0 {
        recommendations.push(Recommendation::new(
            RecommendationType::Info,
            "Belum ada aktivitas olahraga tercatat. \
             Coba jalan santai 30 menit untuk meningkatkan metabolisme."
                .to_string(),
        ));
    } else if kalori_keluar > HIGH_ACTIVITY_KCAL {
        recommendations.push(Recommendation::new(
            RecommendationType::Success,
            format!(
                "Luar biasa! Anda telah membakar {} kkal hari ini. \
                 Pastikan untuk beristirahat cukup.",
                kalori_keluar
            ),
        ));
    }

    RecommendationReport {
        summary: CalorieSummary {
            kalori_masuk,
            kalori_keluar,
            kebutuhan_dasar: base.round() as i64,
            kalori_bersih,
        },
        recommendations,
    }
}
