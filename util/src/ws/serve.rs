use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::{sync::mpsc, time};

use super::SessionRegistry;
use super::handler_trait::WsSession;
use super::runtime::WsContext;

pub struct WsServerOptions {
    pub ws_ping_sec: u64,
    pub enable_app_ping: bool,
}

impl Default for WsServerOptions {
    fn default() -> Self {
        Self {
            ws_ping_sec: 30,
            enable_app_ping: true,
        }
    }
}

/// Drives one socket: a writer task, a keepalive ping task, a reader that
/// parses frames for the session, and the session itself.
pub async fn serve_session<S: WsSession>(
    socket: WebSocket,
    registry: SessionRegistry,
    topic: String,
    user_id: i64,
    session: S,
    opts: WsServerOptions,
) {
    registry.register(&topic, user_id).await;
    let ping_every = std::time::Duration::from_secs(opts.ws_ping_sec);
    let app_ping = opts.enable_app_ping;

    let (mut sink, mut socket_rx) = socket.split();

    // Outbound queue and writer task
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(64);
    let writer_task = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if sink.send(frame).await.is_err() {
                break;
            }
        }
    });

    let ctx = WsContext::new(topic.clone(), user_id, out_tx.clone());

    // WS-level periodic ping
    let ping_task = {
        let out_tx = out_tx.clone();
        tokio::spawn(async move {
            loop {
                time::sleep(ping_every).await;
                if out_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        })
    };
    drop(out_tx);

    let (in_tx, in_rx) = mpsc::channel::<S::In>(64);
    let session_task = tokio::spawn(session.run(ctx.clone(), in_rx));

    // C→S: parse & queue
    let receive_task = {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            while let Some(Ok(msg)) = socket_rx.next().await {
                match msg {
                    Message::Text(text) => {
                        let raw = text.as_str();
                        if app_ping && is_app_ping(raw) {
                            let _ = ctx
                                .reply_text(
                                    serde_json::json!({
                                        "event": "pong",
                                        "topic": ctx.topic,
                                        "payload": {},
                                        "ts": Utc::now().to_rfc3339(),
                                    })
                                    .to_string(),
                                )
                                .await;
                            continue;
                        }
                        match serde_json::from_str::<S::In>(raw) {
                            Ok(parsed) => {
                                if in_tx.send(parsed).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => tracing::warn!(
                                "WS invalid message on '{}': {e}; raw={raw}",
                                ctx.topic
                            ),
                        }
                    }
                    Message::Ping(payload) => {
                        let _ = ctx.reply_pong(payload).await;
                    }
                    Message::Pong(_) => {}
                    Message::Binary(_) => {
                        tracing::warn!("Ignoring binary on topic '{}'", ctx.topic);
                    }
                    Message::Close(_) => break,
                }
            }
        })
    };
    drop(ctx);

    // Reader ends first on disconnect; dropping its sender ends the session.
    let _ = receive_task.await;
    let _ = session_task.await;
    ping_task.abort();
    let _ = writer_task.await;

    registry.unregister(&topic, user_id).await;
    tracing::info!(user_id, "WS session ended for topic '{topic}'");
}

fn is_app_ping(raw: &str) -> bool {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
        if let Some(Value::String(t)) = map.get("type") {
            return t == "ping";
        }
    }
    false
}
