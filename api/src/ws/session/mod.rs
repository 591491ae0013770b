//! The per-user portal socket at `/ws/session`.
//!
//! One socket carries everything a signed-in surface needs: the live ticket
//! list, toasts with their audio cue, the activity flag and the open ticket's
//! conversation with optimistic status changes.

use axum::{Router, routing::get};
use util::state::AppState;

use crate::ws::session::handlers::session_handler;

pub mod common;
pub mod emit;
pub mod handlers;
pub mod payload;
pub mod ws_handlers;

pub fn ws_session_routes(_app_state: AppState) -> Router<AppState> {
    Router::new().route("/", get(session_handler))
}
