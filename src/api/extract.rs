//! Request extractors
//!
//! `AuthUser` and `AdminUser` guard protected routes. The `Api*` wrappers
//! turn axum's plain-text rejections into the JSON error envelope.

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::error::ApiError;
use super::state::AppState;
use crate::models::{Role, User};

const NO_TOKEN: &str = "Not authorized, no token";
const TOKEN_FAILED: &str = "Not authorized, token failed";
const USER_NOT_FOUND: &str = "Not authorized, user not found";
const FORBIDDEN: &str = "Forbidden: insufficient permissions";

/// JSON body with enveloped rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters with enveloped rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string with enveloped rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Caller authenticated by a bearer token whose user still exists
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    /// Role carried by the token
    pub role: Role,
    pub user: User,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(parts).ok_or_else(|| ApiError::Unauthorized(NO_TOKEN.to_string()))?;

        let claims = state.jwt.validate_token(token).map_err(|e| {
            tracing::debug!("token rejected: {}", e);
            ApiError::Unauthorized(TOKEN_FAILED.to_string())
        })?;

        let user_id = claims.user_id;
        let user = state
            .db
            .call(move |conn| User::get_by_id(conn, user_id))
            .await?
            .ok_or_else(|| ApiError::Unauthorized(USER_NOT_FOUND.to_string()))?;

        Ok(AuthUser {
            id: user.id,
            role: claims.role,
            user,
        })
    }
}

/// Authenticated caller with the admin role.
///
/// Both the token and the stored account must say admin, so a demotion
/// takes effect before the token expires.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if auth.role != Role::Admin || auth.user.role != Role::Admin {
            return Err(ApiError::Forbidden(FORBIDDEN.to_string()));
        }
        Ok(AdminUser(auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/food-logs");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts(Some("Bearer   "))), None);
        assert_eq!(bearer_token(&parts(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }
}
