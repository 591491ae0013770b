use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use services::ticket_service::TicketFilter;
use util::state::AppState;

/// GET /tickets
///
/// Lists visible tickets, most recently updated first.
///
/// ### Query Parameters
/// - `status` (optional): `Aberto`, `Em Andamento` or `Fechado`
/// - `query` (optional): case-insensitive match on subject or client name
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": [
///     {
///       "id": 4,
///       "client_id": 2,
///       "client_name": "Carla Souza",
///       "subject": "Site down",
///       "status": "Aberto",
///       "created_at": "2026-03-02T10:00:00Z",
///       "updated_at": "2026-03-02T10:05:00Z"
///     }
///   ],
///   "message": "Tickets retrieved"
/// }
/// ```
pub async fn list_tickets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(filter): Query<TicketFilter>,
) -> Response {
    match state.tickets().search_tickets(&user.actor(), &filter).await {
        Ok(tickets) => Json(ApiResponse::success(tickets, "Tickets retrieved")).into_response(),
        Err(e) => service_error(e),
    }
}

/// GET /tickets/{ticket_id}
///
/// The ticket with its messages in chronological order.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found` when the ticket does not exist or belongs to another client
pub async fn get_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(ticket_id): Path<i64>,
) -> Response {
    match state.tickets().get_ticket(&user.actor(), ticket_id).await {
        Ok(detail) => Json(ApiResponse::success(detail, "Ticket retrieved")).into_response(),
        Err(e) => service_error(e),
    }
}
