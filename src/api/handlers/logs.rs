//! Food, exercise and sleep log handlers
//!
//! Every route is scoped to the caller; deletes only match rows the caller
//! owns.

use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;

use crate::api::input::{lenient_i64, non_empty};
use crate::api::{ApiError, ApiJson, ApiPath, ApiResponse, ApiResult, AppState, AuthUser};
use crate::models::{
    ExerciseLog, ExerciseLogCreate, FoodLog, FoodLogCreate, SleepLog, SleepLogCreate,
};
use crate::outbound::CalorieMatch;
use crate::stats::{parse_log_date, parse_timestamp};

const NOT_FOUND_OR_NOT_OWNER: &str = "Log tidak ditemukan atau Anda tidak berhak menghapusnya";
const DELETED: &str = "Log berhasil dihapus";

#[derive(Debug, Deserialize)]
pub struct FoodLogRequest {
    pub nama_makanan: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub kalori: Option<i64>,
    pub tanggal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseLogRequest {
    pub nama_olahraga: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub durasi_menit: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub kalori_terbakar: Option<i64>,
    pub tanggal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SleepLogRequest {
    pub waktu_tidur: Option<String>,
    pub waktu_bangun: Option<String>,
    pub kualitas_tidur: Option<String>,
    pub tanggal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CalorieRequest {
    pub name: Option<String>,
}

/// Normalised `tanggal`, today (UTC) when absent
fn resolve_tanggal(tanggal: Option<String>) -> ApiResult<String> {
    match non_empty(tanggal) {
        None => Ok(Utc::now().date_naive().format("%Y-%m-%d").to_string()),
        Some(value) => parse_log_date(&value)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .ok_or_else(|| ApiError::bad_request("Format tanggal tidak valid (YYYY-MM-DD)")),
    }
}

/// Upper bound for calories and minutes on a single log
pub const MAX_LOG_VALUE: i64 = 100_000;

fn in_range(value: i64, field: &str) -> ApiResult<i64> {
    if value < 0 {
        return Err(ApiError::bad_request(format!("{} tidak boleh negatif", field)));
    }
    if value > MAX_LOG_VALUE {
        return Err(ApiError::bad_request(format!("{} maksimal {}", field, MAX_LOG_VALUE)));
    }
    Ok(value)
}

// ============================================================================
// Food
// ============================================================================

/// GET /api/food-logs
pub async fn list_food(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<Vec<FoodLog>>> {
    let user_id = auth.id;
    let logs = state.db.call(move |conn| FoodLog::list_for_user(conn, user_id)).await?;
    Ok(ApiResponse::success(logs))
}

/// POST /api/food-logs
pub async fn create_food(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<FoodLogRequest>,
) -> ApiResult<(StatusCode, ApiResponse<FoodLog>)> {
    let (Some(nama_makanan), Some(kalori)) = (non_empty(req.nama_makanan), req.kalori) else {
        return Err(ApiError::bad_request("Nama makanan dan kalori harus diisi"));
    };

    let data = FoodLogCreate {
        nama_makanan,
        kalori: in_range(kalori, "Kalori")?,
        tanggal: resolve_tanggal(req.tanggal)?,
    };

    let user_id = auth.id;
    let log = state.db.call(move |conn| FoodLog::create(conn, user_id, &data)).await?;
    tracing::info!(user_id, log_id = log.id, kalori = log.kalori, "food log created");

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(log, "Log makanan berhasil ditambahkan"),
    ))
}

/// DELETE /api/food-logs/{id}
pub async fn delete_food(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<FoodLog>> {
    let user_id = auth.id;
    let deleted = state
        .db
        .call(move |conn| FoodLog::delete_for_user(conn, id, user_id))
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_OR_NOT_OWNER))?;

    tracing::info!(user_id, log_id = id, "food log deleted");
    Ok(ApiResponse::with_message(deleted, DELETED))
}

/// POST /api/food-logs/calories
pub async fn food_calories(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiJson(req): ApiJson<CalorieRequest>,
) -> ApiResult<ApiResponse<CalorieMatch>> {
    let name = non_empty(req.name).ok_or_else(|| ApiError::bad_request("Missing food name"))?;

    let found = state
        .food_facts
        .lookup(&name)
        .await?
        .ok_or_else(|| ApiError::not_found("No calorie data found for that food"))?;

    tracing::debug!(query = %name, matched = %found.matched_name, "calorie lookup hit");
    Ok(ApiResponse::success(found))
}

// ============================================================================
// Exercise
// ============================================================================

/// GET /api/exercise-logs
pub async fn list_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<Vec<ExerciseLog>>> {
    let user_id = auth.id;
    let logs = state
        .db
        .call(move |conn| ExerciseLog::list_for_user(conn, user_id))
        .await?;
    Ok(ApiResponse::success(logs))
}

/// POST /api/exercise-logs
pub async fn create_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<ExerciseLogRequest>,
) -> ApiResult<(StatusCode, ApiResponse<ExerciseLog>)> {
    let (Some(nama_olahraga), Some(durasi_menit), Some(kalori_terbakar)) =
        (non_empty(req.nama_olahraga), req.durasi_menit, req.kalori_terbakar)
    else {
        return Err(ApiError::bad_request(
            "Jenis olahraga, durasi, dan kalori terbakar harus diisi",
        ));
    };

    let data = ExerciseLogCreate {
        nama_olahraga,
        durasi_menit: in_range(durasi_menit, "Durasi")?,
        kalori_terbakar: in_range(kalori_terbakar, "Kalori terbakar")?,
        tanggal: resolve_tanggal(req.tanggal)?,
    };

    let user_id = auth.id;
    let log = state
        .db
        .call(move |conn| ExerciseLog::create(conn, user_id, &data))
        .await?;
    tracing::info!(user_id, log_id = log.id, menit = log.durasi_menit, "exercise log created");

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(log, "Log olahraga berhasil ditambahkan"),
    ))
}

/// DELETE /api/exercise-logs/{id}
pub async fn delete_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<ExerciseLog>> {
    let user_id = auth.id;
    let deleted = state
        .db
        .call(move |conn| ExerciseLog::delete_for_user(conn, id, user_id))
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_OR_NOT_OWNER))?;

    tracing::info!(user_id, log_id = id, "exercise log deleted");
    Ok(ApiResponse::with_message(deleted, DELETED))
}

// ============================================================================
// Sleep
// ============================================================================

/// GET /api/sleep-logs
pub async fn list_sleep(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<Vec<SleepLog>>> {
    let user_id = auth.id;
    let logs = state
        .db
        .call(move |conn| SleepLog::list_for_user(conn, user_id))
        .await?;
    Ok(ApiResponse::success(logs))
}

/// POST /api/sleep-logs
pub async fn create_sleep(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<SleepLogRequest>,
) -> ApiResult<(StatusCode, ApiResponse<SleepLog>)> {
    let (Some(waktu_tidur), Some(waktu_bangun)) =
        (non_empty(req.waktu_tidur), non_empty(req.waktu_bangun))
    else {
        return Err(ApiError::bad_request("Waktu tidur dan waktu bangun harus diisi"));
    };

    if parse_timestamp(&waktu_tidur).is_none() || parse_timestamp(&waktu_bangun).is_none() {
        return Err(ApiError::bad_request("Format waktu tidak valid"));
    }

    let tanggal = match non_empty(req.tanggal) {
        Some(value) => resolve_tanggal(Some(value))?,
        None => parse_log_date(&waktu_bangun)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .ok_or_else(|| ApiError::bad_request("Format waktu tidak valid"))?,
    };

    let data = SleepLogCreate {
        tanggal,
        waktu_tidur,
        waktu_bangun,
        kualitas_tidur: non_empty(req.kualitas_tidur),
    };

    let user_id = auth.id;
    let log = state
        .db
        .call(move |conn| SleepLog::create(conn, user_id, &data))
        .await?;
    tracing::info!(user_id, log_id = log.id, "sleep log created");

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(log, "Log tidur berhasil ditambahkan"),
    ))
}

/// DELETE /api/sleep-logs/{id}
pub async fn delete_sleep(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<SleepLog>> {
    let user_id = auth.id;
    let deleted = state
        .db
        .call(move |conn| SleepLog::delete_for_user(conn, id, user_id))
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_OR_NOT_OWNER))?;

    tracing::info!(user_id, log_id = id, "sleep log deleted");
    Ok(ApiResponse::with_message(deleted, DELETED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_tanggal() {
        assert_eq!(
            resolve_tanggal(Some("2025-03-04T00:00:00.000Z".into())).unwrap(),
            "2025-03-04"
        );
        assert_eq!(resolve_tanggal(Some("  ".into())).unwrap().len(), 10);
        assert!(resolve_tanggal(Some("04/03/2025".into())).is_err());
    }

    #[test]
    fn test_in_range() {
        assert_eq!(in_range(0, "Kalori").unwrap(), 0);
        assert_eq!(in_range(MAX_LOG_VALUE, "Kalori").unwrap(), MAX_LOG_VALUE);
        assert!(in_range(-1, "Kalori").is_err());
        assert!(in_range(MAX_LOG_VALUE + 1, "Durasi").is_err());
        assert!(in_range(i64::MAX, "Kalori").is_err());
    }
}
