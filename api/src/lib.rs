pub mod auth;
pub mod response;
pub mod routes;
pub mod ws;

use axum::{
    Router,
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    middleware::from_fn,
};
use tower_http::cors::CorsLayer;
use util::state::AppState;

use crate::{auth::middleware::log_request, routes::routes, ws::ws_routes};

/// The complete application: `/api/...` HTTP routes and `/ws/...` sockets.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::very_permissive().expose_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .nest("/api", routes(state.clone()))
        .nest("/ws", ws_routes(state.clone()))
        .with_state(state)
        .layer(from_fn(log_request))
        .layer(cors)
}
