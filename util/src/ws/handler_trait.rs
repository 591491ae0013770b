use super::runtime::WsContext;
use serde::de::DeserializeOwned;
use std::future::Future;
use tokio::sync::mpsc;

/// A stateful conversation with one connected client.
///
/// The server parses every text frame into `Self::In` and queues it on
/// `inbound`; the session owns its loop and returns when `inbound` closes.
pub trait WsSession: Send + 'static {
    /// The incoming message type your session understands (tagged enum recommended)
    type In: DeserializeOwned + Send + 'static;

    fn run(
        self,
        ctx: WsContext,
        inbound: mpsc::Receiver<Self::In>,
    ) -> impl Future<Output = ()> + Send;
}
