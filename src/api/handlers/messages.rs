//! User ↔ admin messaging handlers

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::api::input::{lenient_i64, non_empty};
use crate::api::{ApiError, ApiJson, ApiResponse, ApiResult, AppState, AuthUser};
use crate::models::{Message, ReceivedMessage, User};

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub receiver_id: Option<i64>,
    pub message: Option<String>,
}

/// POST /api/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<SendRequest>,
) -> ApiResult<(StatusCode, ApiResponse<Message>)> {
    let (Some(receiver_id), Some(text)) = (req.receiver_id, non_empty(req.message)) else {
        return Err(ApiError::bad_request("Receiver and message required"));
    };

    let sender_id = auth.id;
    let sent = state
        .db
        .call(move |conn| {
            if User::get_by_id(conn, receiver_id)?.is_none() {
                return Ok(None);
            }
            Message::send(conn, sender_id, receiver_id, &text).map(Some)
        })
        .await?
        .ok_or_else(|| ApiError::not_found("Receiver not found"))?;

    tracing::info!(sender_id, receiver_id, message_id = sent.id, "message sent");
    Ok((StatusCode::CREATED, ApiResponse::with_message(sent, "Message sent")))
}

/// GET /api/messages
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<Vec<ReceivedMessage>>> {
    let user_id = auth.id;
    let messages = state
        .db
        .call(move |conn| Message::list_received(conn, user_id))
        .await?;
    Ok(ApiResponse::success(messages))
}
