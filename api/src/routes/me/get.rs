use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{ProfileResponse, service_error};
use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct UnreadResponse {
    pub count: u64,
}

/// GET /me
pub async fn get_me(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> Response {
    match state.auth().profile(user.0.sub).await {
        Ok(profile) => Json(ApiResponse::success(
            ProfileResponse::from(profile),
            "Profile retrieved",
        ))
        .into_response(),
        Err(e) => service_error(e),
    }
}

/// GET /me/unread
///
/// Tickets updated since the last time the list was checked. Zero when the
/// list was never checked.
///
/// ```json
/// { "success": true, "data": { "count": 3 }, "message": "Unread count retrieved" }
/// ```
pub async fn get_unread(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match state.ledger().get_unread_count(&user.actor()).await {
        Ok(count) => {
            Json(ApiResponse::success(UnreadResponse { count }, "Unread count retrieved"))
                .into_response()
        }
        Err(e) => service_error(e),
    }
}
