//! # auth Routes Module
//!
//! Routes for the `/auth` endpoint group. All public except `/logout`.
//!
//! ## Structure
//! - `post.rs`: register, login and logout

pub mod post;

use crate::auth::guards::allow_authenticated;
use axum::{Router, middleware::from_fn, routing::post};
use post::{login, logout, register};
use util::state::AppState;

/// Builds the `/auth` route group.
///
/// - `POST /auth/register` → `register`
/// - `POST /auth/login` → `login`
/// - `POST /auth/logout` → `logout`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/logout",
            post(logout).route_layer(from_fn(allow_authenticated)),
        )
}
