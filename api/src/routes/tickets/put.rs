use super::common::StatusRequest;
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;
use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use util::state::AppState;

/// PUT /tickets/{ticket_id}/status
///
/// ### Request Body
/// ```json
/// { "status": "Fechado" }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated ticket row
/// - `403 Forbidden` for clients
/// - `404 Not Found`
pub async fn set_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(ticket_id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> Response {
    match state
        .tickets()
        .set_status(&user.actor(), ticket_id, req.status)
        .await
    {
        Ok(ticket) => Json(ApiResponse::success(ticket, "Status updated")).into_response(),
        Err(e) => service_error(e),
    }
}
