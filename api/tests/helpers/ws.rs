use axum::Router;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{Duration, timeout};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, client::IntoClientRequest},
};
use url::Url;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Spawns the app on a random local port.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

/// Connects to `/ws/{topic}?token=...`.
pub async fn connect_ws(
    addr: &SocketAddr,
    topic: &str,
    token: &str,
) -> Result<
    (WsStream, axum::http::Response<Option<Vec<u8>>>),
    tokio_tungstenite::tungstenite::Error,
> {
    let url = Url::parse(&format!("ws://{addr}/ws/{topic}?token={token}")).unwrap();
    let req = url.to_string().into_client_request().unwrap();
    connect_async(req).await
}

pub async fn send_json(ws: &mut WsStream, value: Value) {
    ws.send(Message::Text(value.to_string().into())).await.unwrap();
}

/// Reads frames until an envelope named `event` arrives. Panics after 3 s.
pub async fn next_event(ws: &mut WsStream, event: &str) -> Value {
    let wait = async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    let value: Value = serde_json::from_str(text.as_str()).unwrap();
                    if value["event"] == event {
                        return value;
                    }
                }
                Some(Ok(_)) => continue,
                other => panic!("socket ended while waiting for '{event}': {other:?}"),
            }
        }
    };
    timeout(Duration::from_secs(3), wait)
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for '{event}'"))
}

/// Every event name received within `window`.
pub async fn drain_events(ws: &mut WsStream, window: Duration) -> Vec<String> {
    let mut seen = Vec::new();
    let _ = timeout(window, async {
        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Text(text) = msg {
                let value: Value = serde_json::from_str(text.as_str()).unwrap();
                if let Some(name) = value["event"].as_str() {
                    seen.push(name.to_string());
                }
            }
        }
    })
    .await;
    seen
}
