use super::payload::{
    Activity, ErrorNotice, Ready, StatusChange, StatusOutcome, TicketView, Tickets, ToastId,
};
use portal::backend::TicketBackend;
use portal::conversation::{PendingStatus, StatusTransition};
use portal::cue::AudioCue;
use portal::toast::Toast;
use portal::{ConversationError, SessionUser, TicketConversation};
use services::ServiceError;
use util::ws::WsContext;

pub async fn ready(ctx: &WsContext, user: &SessionUser, unread: u64) -> bool {
    ctx.emit("session.ready", &Ready { user, unread }).await
}

pub async fn tickets(ctx: &WsContext, tickets: Tickets) -> bool {
    ctx.emit("tickets.list", &tickets).await
}

pub async fn toast(ctx: &WsContext, toast: &Toast) -> bool {
    ctx.emit("toast.shown", toast).await
}

pub async fn toast_expired(ctx: &WsContext, id: u64) -> bool {
    ctx.emit("toast.expired", &ToastId { id }).await
}

pub async fn toast_dismissed(ctx: &WsContext, id: u64) -> bool {
    ctx.emit("toast.dismissed", &ToastId { id }).await
}

pub async fn cue(ctx: &WsContext, cue: &AudioCue) -> bool {
    ctx.emit("cue.play", cue).await
}

pub async fn activity(ctx: &WsContext, has_new_activity: bool, unread: Option<u64>) -> bool {
    ctx.emit(
        "activity",
        &Activity {
            has_new_activity,
            unread,
        },
    )
    .await
}

pub async fn ticket<B: TicketBackend>(ctx: &WsContext, conv: &TicketConversation<B>) -> bool {
    ctx.emit(
        "ticket.view",
        &TicketView {
            ticket_id: conv.ticket_id(),
            ticket: conv.ticket(),
            phase: conv.phase(),
            draft: conv.draft(),
            can_send: conv.can_send(),
            can_change_status: conv.can_change_status(),
        },
    )
    .await
}

pub async fn status_applying(ctx: &WsContext, pending: &PendingStatus) -> bool {
    ctx.emit(
        "ticket.status",
        &StatusChange {
            ticket_id: pending.ticket_id,
            status: pending.target,
            outcome: StatusOutcome::Applying,
            error: None,
        },
    )
    .await
}

pub async fn status_settled(ctx: &WsContext, ticket_id: i64, transition: &StatusTransition) -> bool {
    let change = match transition {
        StatusTransition::Applying(pending) => return status_applying(ctx, pending).await,
        StatusTransition::Confirmed(status) => StatusChange {
            ticket_id,
            status: *status,
            outcome: StatusOutcome::Confirmed,
            error: None,
        },
        StatusTransition::RolledBack { restored, error } => StatusChange {
            ticket_id,
            status: *restored,
            outcome: StatusOutcome::RolledBack,
            error: Some(error.to_string()),
        },
    };
    ctx.emit("ticket.status", &change).await
}

/// Service failures block; guard rejections are inline.
pub async fn error(ctx: &WsContext, err: &ConversationError) -> bool {
    let blocking = matches!(err, ConversationError::Service(_));
    let message = match err {
        ConversationError::Service(ServiceError::Transport(_)) => {
            "Something went wrong. Please try again.".to_string()
        }
        other => other.to_string(),
    };
    ctx.emit("error", &ErrorNotice { message, blocking }).await
}
