//! Routes under `/me`: the acting user's profile and unread-activity ledger.

pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

/// - `GET /me` → `get::get_me`
/// - `GET /me/unread` → `get::get_unread`
/// - `POST /me/unread/checked` → `post::mark_checked`
pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::get_me))
        .route("/unread", get(get::get_unread))
        .route("/unread/checked", post(post::mark_checked))
}
