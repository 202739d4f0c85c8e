//! Announcement handlers

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::api::input::non_empty;
use crate::api::{AdminUser, ApiError, ApiJson, ApiPath, ApiResponse, ApiResult, AppState, AuthUser};
use crate::models::Journal;

#[derive(Debug, Deserialize)]
pub struct JournalRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// GET /api/journals
pub async fn list_journals(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<ApiResponse<Vec<Journal>>> {
    let journals = state.db.call(Journal::list).await?;
    Ok(ApiResponse::success(journals))
}

/// POST /api/journals
pub async fn create_journal(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(req): ApiJson<JournalRequest>,
) -> ApiResult<(StatusCode, ApiResponse<Journal>)> {
    let (Some(title), Some(content)) = (non_empty(req.title), non_empty(req.content)) else {
        return Err(ApiError::bad_request("Title and content are required"));
    };

    let journal = state
        .db
        .call(move |conn| Journal::create(conn, &title, &content))
        .await?;

    tracing::info!(admin_id = admin.id, journal_id = journal.id, "journal created");
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(journal, "Journal created successfully"),
    ))
}

/// DELETE /api/journals/{id}
pub async fn delete_journal(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<()>> {
    let deleted = state.db.call(move |conn| Journal::delete(conn, id)).await?;
    if !deleted {
        return Err(ApiError::not_found("Journal not found"));
    }

    tracing::info!(admin_id = admin.id, journal_id = id, "journal deleted");
    Ok(ApiResponse::message("Journal deleted"))
}
