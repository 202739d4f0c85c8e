//! Chat completion proxy

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::api::input::non_empty;
use crate::api::{ApiError, ApiJson, ApiResult, AppState, AuthUser};
use crate::outbound::{ChatRequest, OutboundError};

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub messages: Value,
    pub model: Option<String>,
}

/// POST /api/chat
///
/// Replies with the upstream JSON as-is, including upstream error bodies.
pub async fn create_completion(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<ChatBody>,
) -> ApiResult<Json<Value>> {
    if !state.chat.is_configured() {
        return Err(OutboundError::NotConfigured("OPENROUTER_API_KEY").into());
    }

    let messages = match body.messages {
        Value::Array(items) if !items.is_empty() => items,
        _ => return Err(ApiError::bad_request("messages must be a non-empty array")),
    };

    let request = ChatRequest {
        model: non_empty(body.model)
            .unwrap_or_else(|| state.settings.integrations.chat_model.clone()),
        messages,
    };

    tracing::debug!(
        user_id = auth.id,
        model = %request.model,
        turns = request.messages.len(),
        "chat completion"
    );
    let reply = state.chat.complete(&request).await?;
    Ok(Json(reply))
}
