use db::models::tickets::TicketStatus;
use serde::Deserialize;

/// Frames a portal surface sends on its session socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionIncoming {
    /// Open a ticket's conversation. Replaces any open one.
    OpenTicket { ticket_id: i64 },
    CloseTicket,
    /// The ticket list is on screen; clears the activity flag and the
    /// unread count.
    ViewTickets,
    /// Tab visibility changes.
    Visibility { foreground: bool },
    Dismiss { id: u64 },
    SendMessage { content: String },
    ChangeStatus { status: TicketStatus },
    SignOut,
}
