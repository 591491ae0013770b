//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness (public)
//! - `/auth` → register, login, logout (public)
//! - `/me` → the acting user's profile and unread-activity ledger
//! - `/tickets` → ticket list, conversation, messages and status
//! - `/clients` → client directory (employees only)

use crate::auth::guards::{allow_authenticated, allow_employee};
use crate::routes::{
    auth::auth_routes, clients::clients_routes, health::health_routes, me::me_routes,
    tickets::tickets_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod auth;
pub mod clients;
pub mod common;
pub mod health;
pub mod me;
pub mod tickets;

/// Builds every `/api` route with its access guard.
pub fn routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes(app_state.clone()))
        .nest("/auth", auth_routes())
        .nest("/me", me_routes().route_layer(from_fn(allow_authenticated)))
        .nest(
            "/tickets",
            tickets_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest("/clients", clients_routes().route_layer(from_fn(allow_employee)))
}
