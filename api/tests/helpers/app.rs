use api::auth::generate_jwt;
use axum::{Router, body::Body, response::Response};
use db::models::profile::Model as ProfileModel;
use db::test_utils::setup_test_db;
use serde_json::Value;
use util::config::AppConfig;
use util::state::AppState;

pub const TEST_SECRET: &str = "test-secret";

/// Full application over a fresh in-memory database.
pub async fn make_test_app() -> (Router, AppState) {
    AppConfig::set_jwt_secret(TEST_SECRET);
    let db = setup_test_db().await;
    let state = AppState::new(db);
    (api::app(state.clone()), state)
}

pub fn token_for(profile: &ProfileModel) -> String {
    generate_jwt(profile.id, profile.role).unwrap().0
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
