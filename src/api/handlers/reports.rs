//! Weekly report, statistics, export and recommendation handlers

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Deserialize;

use crate::api::{ApiError, ApiQuery, ApiResponse, ApiResult, AppState, AuthUser};
use crate::export::{csv, pdf, ExportFormat};
use crate::models::{ProfileView, UserLogs};
use crate::stats::{
    daily_breakdown, exercise_trend, recommend, statistics, weekly_report, BodyProfile,
    ExerciseTrendPoint, RecommendationReport, Statistics, WeeklyReport,
};

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

async fn load_logs(state: &AppState, user_id: i64) -> ApiResult<UserLogs> {
    Ok(state.db.call(move |conn| UserLogs::load(conn, user_id)).await?)
}

async fn load_weekly(state: &AppState, user_id: i64) -> ApiResult<WeeklyReport> {
    let logs = load_logs(state, user_id).await?;
    Ok(weekly_report(&logs.food, &logs.exercise, &logs.sleep, Utc::now()))
}

/// GET /api/laporan/data
pub async fn report_data(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<WeeklyReport>> {
    let report = load_weekly(&state, auth.id).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/laporan/statistics
pub async fn report_statistics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<Statistics>> {
    let logs = load_logs(&state, auth.id).await?;
    let stats = statistics(&logs.food, &logs.exercise, &logs.sleep);

    if stats.skipped_sleep_entries > 0 {
        tracing::debug!(
            user_id = auth.id,
            skipped = stats.skipped_sleep_entries,
            "sleep logs without a measurable duration"
        );
    }
    Ok(ApiResponse::success(stats))
}

/// GET /api/laporan/exercise-trend
pub async fn report_exercise_trend(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<Vec<ExerciseTrendPoint>>> {
    let report = load_weekly(&state, auth.id).await?;
    Ok(ApiResponse::success(exercise_trend(&report.exercise_logs)))
}

/// GET /api/laporan/export?format=csv|pdf
pub async fn report_export(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ExportQuery>,
) -> ApiResult<Response> {
    let requested = query.format.unwrap_or_else(|| "csv".to_string());
    let format = ExportFormat::from_str(requested.trim())
        .ok_or_else(|| ApiError::bad_request("format must be one of csv|pdf"))?;

    let report = load_weekly(&state, auth.id).await?;
    let days = daily_breakdown(&report);

    let body = match format {
        ExportFormat::Csv => csv::render(&days).into_bytes(),
        ExportFormat::Pdf => {
            let nama = auth.user.nama.clone();
            tokio::task::spawn_blocking(move || pdf::render(&nama, &report, &days, Utc::now()))
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))??
        }
    };

    tracing::info!(user_id = auth.id, %format, bytes = body.len(), "report exported");

    let disposition = format!("attachment; filename=\"{}\"", format.file_name());
    Ok((
        [
            (CONTENT_TYPE, format.content_type().to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// GET /api/recommendations
pub async fn recommendations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<RecommendationReport>> {
    let user_id = auth.id;
    let (view, logs) = state
        .db
        .call(move |conn| Ok((ProfileView::get(conn, user_id)?, UserLogs::load(conn, user_id)?)))
        .await?;

    let profile = view
        .map(|v| BodyProfile {
            tinggi_badan: v.tinggi_badan,
            berat_badan: v.berat_badan,
            tanggal_lahir: v.tanggal_lahir,
            jenis_kelamin: v.jenis_kelamin,
        })
        .unwrap_or_default();

    let report = recommend(&logs.food, &logs.exercise, &profile, Utc::now().date_naive());
    Ok(ApiResponse::success(report))
}
