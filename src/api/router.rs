//! Route table

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

use super::handlers::{admin, chat, journals, logs, messages, reports, status, users};
use super::state::AppState;

/// Request cap for the avatar route; leaves room for multipart framing
const AVATAR_BODY_LIMIT: usize = users::MAX_AVATAR_BYTES + 512 * 1024;

async fn route_not_found() -> (StatusCode, axum::Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        axum::Json(json!({ "success": false, "error": "Route not found" })),
    )
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.settings.uploads.dir);

    let public_routes = Router::new()
        .route("/", get(status::root))
        .route("/api/status", get(status::status))
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login));

    let user_routes = Router::new()
        .route(
            "/api/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route(
            "/api/users/avatar",
            post(users::upload_avatar).layer(DefaultBodyLimit::max(AVATAR_BODY_LIMIT)),
        )
        .route("/api/food-logs", get(logs::list_food).post(logs::create_food))
        .route("/api/food-logs/calories", post(logs::food_calories))
        .route("/api/food-logs/{id}", delete(logs::delete_food))
        .route(
            "/api/exercise-logs",
            get(logs::list_exercise).post(logs::create_exercise),
        )
        .route("/api/exercise-logs/{id}", delete(logs::delete_exercise))
        .route("/api/sleep-logs", get(logs::list_sleep).post(logs::create_sleep))
        .route("/api/sleep-logs/{id}", delete(logs::delete_sleep))
        .route("/api/laporan/data", get(reports::report_data))
        .route("/api/laporan/statistics", get(reports::report_statistics))
        .route("/api/laporan/exercise-trend", get(reports::report_exercise_trend))
        .route("/api/laporan/export", get(reports::report_export))
        .route("/api/recommendations", get(reports::recommendations))
        .route(
            "/api/journals",
            get(journals::list_journals).post(journals::create_journal),
        )
        .route("/api/journals/{id}", delete(journals::delete_journal))
        .route(
            "/api/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route("/api/chat", post(chat::create_completion));

    let admin_routes = Router::new()
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}", get(admin::user_detail))
        .route("/api/admin/users/{id}/logs", get(admin::user_logs))
        .route("/api/admin/users/{id}/role", patch(admin::update_role));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .nest_service("/uploads", uploads)
        .fallback(route_not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(state)
}
