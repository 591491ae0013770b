pub mod app;
pub mod ws;

pub use app::{body_json, make_test_app, token_for};
pub use ws::{connect_ws, drain_events, next_event, send_json, spawn_server};
