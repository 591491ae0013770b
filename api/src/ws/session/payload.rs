use db::models::tickets::TicketStatus;
use db::repositories::ticket_repository::{TicketDetail, TicketSummary};
use portal::{Phase, SessionUser};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Ready<'a> {
    pub user: &'a SessionUser,
    pub unread: u64,
}

#[derive(Debug, Serialize)]
pub struct Tickets {
    pub tickets: Vec<TicketSummary>,
}

#[derive(Debug, Serialize)]
pub struct Activity {
    pub has_new_activity: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct TicketView<'a> {
    pub ticket_id: i64,
    pub ticket: Option<&'a TicketDetail>,
    pub phase: Phase,
    pub draft: &'a str,
    pub can_send: bool,
    pub can_change_status: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusOutcome {
    Applying,
    Confirmed,
    RolledBack,
}

#[derive(Debug, Serialize)]
pub struct StatusChange {
    pub ticket_id: i64,
    pub status: TicketStatus,
    pub outcome: StatusOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `blocking` errors should interrupt the user (a modal); the rest are
/// inline hints.
#[derive(Debug, Serialize)]
pub struct ErrorNotice {
    pub message: String,
    pub blocking: bool,
}

#[derive(Debug, Serialize)]
pub struct ToastId {
    pub id: u64,
}
