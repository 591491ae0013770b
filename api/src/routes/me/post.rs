use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;
use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct CheckedResponse {
    pub checked_at: Option<DateTime<Utc>>,
}

/// POST /me/unread/checked
///
/// Moves the last-checked marker to now, clearing the unread count.
pub async fn mark_checked(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match state.ledger().mark_checked(&user.actor()).await {
        Ok(at) => Json(ApiResponse::success(
            CheckedResponse {
                checked_at: Some(at),
            },
            "Tickets marked as checked",
        ))
        .into_response(),
        Err(e) => service_error(e),
    }
}
