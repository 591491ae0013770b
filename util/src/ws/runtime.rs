use axum::extract::ws::{Message, Utf8Bytes};
use serde::Serialize;
use tokio::sync::mpsc;

/// Outbound side of one socket, handed to the session.
#[derive(Clone)]
pub struct WsContext {
    pub topic: String,
    pub user_id: i64,
    // enqueue frames for the writer task
    out_tx: mpsc::Sender<Message>,
}

impl WsContext {
    pub fn new(topic: String, user_id: i64, out_tx: mpsc::Sender<Message>) -> Self {
        Self {
            topic,
            user_id,
            out_tx,
        }
    }

    /// Send a single text frame to this client.
    pub async fn reply_text(&self, text: impl Into<Utf8Bytes>) -> Result<(), ()> {
        self.out_tx
            .send(Message::Text(text.into()))
            .await
            .map_err(|_| ())
    }

    pub async fn reply_pong(&self, payload: bytes::Bytes) -> Result<(), ()> {
        self.out_tx
            .send(Message::Pong(payload))
            .await
            .map_err(|_| ())
    }

    pub async fn send(&self, msg: Message) -> Result<(), ()> {
        self.out_tx.send(msg).await.map_err(|_| ())
    }

    /// Send a JSON event envelope to this client. Returns `false` once the
    /// client is gone.
    pub async fn emit<T: Serialize>(&self, event: &str, payload: &T) -> bool {
        match super::envelope(&self.topic, event, payload) {
            Some(json) => self.reply_text(json).await.is_ok(),
            None => true,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.out_tx.is_closed()
    }
}
