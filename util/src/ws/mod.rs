pub mod axum_adapter;
pub mod handler_trait;
pub mod manager;
pub mod runtime;
pub mod serve;

pub use handler_trait::WsSession;
pub use manager::SessionRegistry;
pub use runtime::WsContext;

use chrono::Utc;
use serde::Serialize;

/// Standard event envelope sent over the session socket.
#[derive(Serialize)]
pub struct EventEnvelope<'a, T> {
    #[serde(rename = "type")]
    pub r#type: &'static str,
    pub event: &'a str,
    pub topic: &'a str,
    pub payload: T,
    pub ts: String,
}

/// Serializes an `EventEnvelope` for `event` on `topic`.
pub fn envelope<T: Serialize>(topic: &str, event: &str, payload: &T) -> Option<String> {
    let env = EventEnvelope {
        r#type: "event",
        event,
        topic,
        payload,
        ts: Utc::now().to_rfc3339(),
    };
    match serde_json::to_string(&env) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize '{event}' on '{topic}': {e}");
            None
        }
    }
}
