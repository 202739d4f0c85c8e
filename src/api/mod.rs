//! REST API
//!
//! Axum router, shared state, extractors and one handler module per
//! resource. Every JSON reply uses the [`ApiResponse`] envelope except the
//! chat proxy, which returns the upstream body unchanged.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod input;
pub mod response;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::{AdminUser, ApiJson, ApiPath, ApiQuery, AuthUser};
pub use response::ApiResponse;
pub use router::router;
pub use state::AppState;
