use crate::auth::{AuthUser, generate_jwt};
use crate::response::ApiResponse;
use crate::routes::common::{ProfileResponse, service_error};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::profile::Model as Profile;
use serde::{Deserialize, Serialize};
use services::auth_service::NewAccount;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct SessionResponse {
    pub user: ProfileResponse,
    pub token: String,
    pub expires_at: String,
}

fn issue_session(profile: Profile, status: StatusCode, message: &str) -> Response {
    match generate_jwt(profile.id, profile.role) {
        Ok((token, expires_at)) => (
            status,
            Json(ApiResponse::success(
                SessionResponse {
                    user: profile.into(),
                    token,
                    expires_at,
                },
                message,
            )),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to sign token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<SessionResponse>::error("Could not issue token")),
            )
                .into_response()
        }
    }
}

/// POST /auth/register
///
/// Creates a client account and signs it in. Staff accounts are never
/// created here.
///
/// ### Request Body
/// ```json
/// {
///   "name": "Carla Souza",
///   "email": "carla@client.com",
///   "password": "secret1",
///   "company": "Padaria Souza"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with `{ user, token, expires_at }`
/// - `400 Bad Request` on validation failure
/// - `401 Unauthorized` when the email is already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<NewAccount>,
) -> Response {
    match state.auth().create_account(req).await {
        Ok(profile) => issue_session(profile, StatusCode::CREATED, "Account created"),
        Err(e) => service_error(e),
    }
}

/// POST /auth/login
///
/// ### Request Body
/// ```json
/// { "email": "carla@client.com", "password": "secret1" }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ user, token, expires_at }`
/// - `401 Unauthorized` with `"Invalid email or password"`
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state.auth().authenticate(req.email.trim(), &req.password).await {
        Ok(profile) => issue_session(profile, StatusCode::OK, "Login successful"),
        Err(e) => service_error(e),
    }
}

/// POST /auth/logout
///
/// Tokens are stateless; this only records the sign-out.
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> impl IntoResponse {
    state.auth().end_session(user.0.sub);
    Json(ApiResponse::success((), "Signed out"))
}
