pub mod get;

use axum::{Router, routing::get};
use util::state::AppState;

/// - `GET /clients` → `get::list_clients`
pub fn clients_routes() -> Router<AppState> {
    Router::new().route("/", get(get::list_clients))
}
