use axum::{Router, middleware::from_fn};
use util::state::AppState;

use crate::{auth::guards::allow_authenticated, ws::session::ws_session_routes};

pub mod session;

pub fn ws_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/session", ws_session_routes(app_state.clone()))
        .route_layer(from_fn(allow_authenticated))
        .with_state(app_state)
}
