//! Ticket routes under `/tickets`.
//!
//! Every route is role scoped: clients see only their own tickets, employees
//! see all of them. A ticket outside the caller's scope is reported as missing.

pub mod common;
pub mod get;
pub mod post;
pub mod put;

use axum::{
    Router,
    routing::{get, post, put},
};
use util::state::AppState;

/// - `GET /tickets` → `get::list_tickets`
/// - `POST /tickets` → `post::create_ticket`
/// - `GET /tickets/{ticket_id}` → `get::get_ticket`
/// - `POST /tickets/{ticket_id}/messages` → `post::append_message`
/// - `PUT /tickets/{ticket_id}/status` → `put::set_status`
pub fn tickets_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_tickets).post(post::create_ticket))
        .route("/{ticket_id}", get(get::get_ticket))
        .route("/{ticket_id}/messages", post(post::append_message))
        .route("/{ticket_id}/status", put(put::set_status))
}
