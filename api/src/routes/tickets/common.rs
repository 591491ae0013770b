use chrono::{DateTime, Utc};
use db::models::{ticket_messages::Model as TicketMessage, tickets::TicketStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: TicketStatus,
}

#[derive(Debug, Serialize, Default)]
pub struct MessageResponse {
    pub id: i64,
    pub ticket_id: i64,
    pub author_id: i64,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<TicketMessage> for MessageResponse {
    fn from(m: TicketMessage) -> Self {
        Self {
            id: m.id,
            ticket_id: m.ticket_id,
            author_id: m.author_id,
            content: m.content,
            timestamp: Some(m.timestamp),
        }
    }
}
