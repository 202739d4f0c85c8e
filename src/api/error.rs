//! API error type and its HTTP mapping

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::AuthError;
use crate::db::DbError;
use crate::export::ExportError;
use crate::outbound::OutboundError;

/// Message sent to clients for any 5xx that is not passed through
const SERVER_ERROR_MESSAGE: &str = "Terjadi kesalahan server";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Reply from an outbound service, forwarded as-is
    #[error("Upstream error {status}")]
    Upstream { status: StatusCode, body: Value },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => {
                tracing::warn!(status = status.as_u16(), "{}", msg);
                msg
            }
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                SERVER_ERROR_MESSAGE.to_string()
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                SERVER_ERROR_MESSAGE.to_string()
            }
            ApiError::Upstream { body, .. } => {
                tracing::warn!(status = status.as_u16(), "upstream error passed through");
                return (status, Json(body)).into_response();
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<OutboundError> for ApiError {
    fn from(e: OutboundError) -> Self {
        match e {
            OutboundError::Upstream { status, body } => ApiError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            },
            OutboundError::NotConfigured(what) => ApiError::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({
                    "success": false,
                    "error": format!("{} not configured on server", what),
                }),
            },
            OutboundError::Network(err) => {
                tracing::error!("outbound request failed: {}", err);
                ApiError::Upstream {
                    status: StatusCode::BAD_GATEWAY,
                    body: json!({
                        "success": false,
                        "error": "Layanan eksternal tidak dapat dihubungi",
                    }),
                }
            }
            OutboundError::Decode(msg) => {
                tracing::error!("outbound payload invalid: {}", msg);
                ApiError::Upstream {
                    status: StatusCode::BAD_GATEWAY,
                    body: json!({
                        "success": false,
                        "error": "Respons layanan eksternal tidak valid",
                    }),
                }
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Database(DbError::Sqlite(rusqlite::Error::InvalidQuery)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_status_is_kept() {
        let err: ApiError = OutboundError::Upstream {
            status: 429,
            body: json!({ "error": "rate limited" }),
        }
        .into();
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);

        let err: ApiError = OutboundError::NotConfigured("OPENROUTER_API_KEY").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
