use super::serve::{WsServerOptions, serve_session};
use super::{SessionRegistry, WsSession};
use axum::extract::{WebSocketUpgrade, ws::WebSocket};
use axum::response::IntoResponse;

/// Upgrades the request and hands the socket to `session`.
pub fn ws_route<S: WsSession>(
    ws: WebSocketUpgrade,
    registry: SessionRegistry,
    topic: String,
    user_id: i64,
    session: S,
    opts: WsServerOptions,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket: WebSocket| async move {
        serve_session(socket, registry, topic, user_id, session, opts).await;
    })
}
