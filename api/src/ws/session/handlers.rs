use super::ws_handlers::PortalSession;
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portal::SessionContext;
use util::state::AppState;
use util::ws::axum_adapter::ws_route;
use util::ws::serve::WsServerOptions;

/// GET /ws/session
///
/// Resumes the token's user and upgrades. A token for a profile that no
/// longer exists is rejected before the upgrade.
pub async fn session_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    let session = SessionContext::new(state.auth());
    let user = match session.resume(claims.sub).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(user_id = claims.sub, error = %e, "session resume failed");
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error("Session expired")),
            )
                .into_response();
        }
    };

    let portal = PortalSession::new(state.clone(), session, user);
    ws_route(
        ws,
        state.sessions().clone(),
        "session".to_string(),
        claims.sub,
        portal,
        WsServerOptions::default(),
    )
    .into_response()
}
