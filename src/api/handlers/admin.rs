//! Admin user management handlers

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::{AdminUser, ApiError, ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, AppState};
use crate::models::{
    list_logs, ExerciseLog, FoodLog, LogKind, LogList, Role, SleepLog, User,
};

const USER_NOT_FOUND: &str = "User not found";

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub nama: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LogCounts {
    pub food: i64,
    pub exercise: i64,
    pub sleep: i64,
}

#[derive(Debug, Serialize)]
pub struct LatestLogs {
    pub food: Option<FoodLog>,
    pub exercise: Option<ExerciseLog>,
    pub sleep: Option<SleepLog>,
}

#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub user: UserSummary,
    pub counts: LogCounts,
    pub latest: LatestLogs,
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<ApiResponse<Vec<User>>> {
    let users = state.db.call(User::list).await?;
    Ok(ApiResponse::success(users))
}

/// GET /api/admin/users/{id}
pub async fn user_detail(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<UserDetail>> {
    let detail = state
        .db
        .call(move |conn| {
            let Some(user) = User::get_by_id(conn, user_id)? else {
                return Ok(None);
            };

            let counts = LogCounts {
                food: FoodLog::count_for_user(conn, user_id)?,
                exercise: ExerciseLog::count_for_user(conn, user_id)?,
                sleep: SleepLog::count_for_user(conn, user_id)?,
            };
            let latest = LatestLogs {
                food: FoodLog::list_for_user(conn, user_id)?.into_iter().next(),
                exercise: ExerciseLog::list_for_user(conn, user_id)?.into_iter().next(),
                sleep: SleepLog::list_for_user(conn, user_id)?.into_iter().next(),
            };

            Ok(Some(UserDetail {
                user: UserSummary {
                    id: user.id,
                    nama: user.nama,
                    email: user.email,
                    role: user.role,
                },
                counts,
                latest,
            }))
        })
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    Ok(ApiResponse::success(detail))
}

/// GET /api/admin/users/{id}/logs?type=food|exercise|sleep
pub async fn user_logs(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<LogsQuery>,
) -> ApiResult<ApiResponse<LogList>> {
    let kind = query
        .kind
        .as_deref()
        .and_then(LogKind::from_str)
        .ok_or_else(|| ApiError::bad_request("type must be one of food|exercise|sleep"))?;

    let logs = state
        .db
        .call(move |conn| {
            if User::get_by_id(conn, user_id)?.is_none() {
                return Ok(None);
            }
            list_logs(conn, user_id, kind).map(Some)
        })
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    Ok(ApiResponse::success(logs))
}

/// PATCH /api/admin/users/{id}/role
pub async fn update_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(req): ApiJson<RoleRequest>,
) -> ApiResult<ApiResponse<User>> {
    let role = req
        .role
        .as_deref()
        .and_then(Role::from_str)
        .ok_or_else(|| ApiError::bad_request("Invalid role"))?;

    let user = state
        .db
        .call(move |conn| User::set_role(conn, user_id, role))
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    tracing::info!(admin_id = admin.id, user_id, role = role.as_str(), "role updated");
    Ok(ApiResponse::with_message(user, "Role updated"))
}
