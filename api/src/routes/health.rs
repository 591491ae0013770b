use crate::response::ApiResponse;
use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;
use util::state::AppState;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    open_sessions: usize,
}

/// Builds the `/health` route group.
pub fn health_routes(_app_state: AppState) -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// GET /health
///
/// ### Response
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": { "status": "OK", "open_sessions": 2 },
///   "message": "Health check passed"
/// }
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let open_sessions = state.sessions().open_sockets().await;
    Json(ApiResponse::success(
        Health {
            status: "OK",
            open_sessions,
        },
        "Health check passed",
    ))
}
