use super::common::MessageResponse;
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::ticket_service::{NewMessage, NewTicket};
use util::state::AppState;

/// POST /tickets
///
/// Opens a ticket with its first message. Clients open tickets for
/// themselves; employees must name the client.
///
/// ### Request Body
/// ```json
/// { "subject": "Site down", "message": "Nothing loads", "client_id": null }
/// ```
///
/// ### Responses
/// - `201 Created` with the ticket and its first message
/// - `400 Bad Request` on blank fields or a missing `client_id`
/// - `404 Not Found` when `client_id` names no profile
pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewTicket>,
) -> Response {
    let actor = user.actor();
    let service = state.tickets();

    let ticket = match service.create_ticket(&actor, req).await {
        Ok(ticket) => ticket,
        Err(e) => return service_error(e),
    };

    match service.get_ticket(&actor, ticket.id).await {
        Ok(detail) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(detail, "Ticket created")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}

/// POST /tickets/{ticket_id}/messages
///
/// Appends a message authored by the caller. The ticket moves to
/// `Em Andamento`.
///
/// ### Request Body
/// ```json
/// { "content": "Any news?" }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` when the content is blank
/// - `404 Not Found`
pub async fn append_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(ticket_id): Path<i64>,
    Json(req): Json<NewMessage>,
) -> Response {
    match state
        .tickets()
        .append_message(&user.actor(), ticket_id, req)
        .await
    {
        Ok(message) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                MessageResponse::from(message),
                "Message sent",
            )),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
