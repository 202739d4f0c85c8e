//! Liveness and status handlers

use axum::extract::State;

use crate::api::{ApiResponse, AppState};
use crate::status::{LifemonStatus, LIVENESS_TEXT};

/// GET /
pub async fn root() -> &'static str {
    LIVENESS_TEXT
}

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> ApiResponse<LifemonStatus> {
    ApiResponse::success(state.status.get_status())
}
