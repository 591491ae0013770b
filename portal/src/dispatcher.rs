//! Turns change-feed events into list refreshes and alerts.
//!
//! An alert plays [`NOTIFICATION_CUE`], raises a toast and sets the sticky
//! "new ticket activity" flag, which stays up until the ticket list is viewed.
//! The flag is live session state only; the durable counterpart is the
//! unread-activity ledger.

use crate::capabilities::Capabilities;
use crate::cue::{AudioCue, NOTIFICATION_CUE};
use crate::session::SessionUser;
use crate::toast::{AlertKind, Toast, ToastQueue};
use db::feed::{ChangeEvent, ChangeKind, ChangeRecord};
use tokio::time::{Duration, Instant};

/// What the surface should do in response to one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    pub refresh_list: bool,
    pub toast: Option<Toast>,
    pub cue: Option<AudioCue>,
}

impl Dispatch {
    fn refresh() -> Self {
        Self {
            refresh_list: true,
            ..Self::default()
        }
    }

    pub fn is_alert(&self) -> bool {
        self.toast.is_some()
    }
}

pub struct NotificationDispatcher {
    user_id: i64,
    caps: Capabilities,
    foreground: bool,
    has_new_activity: bool,
    toasts: ToastQueue,
}

impl NotificationDispatcher {
    pub fn new(user: &SessionUser) -> Self {
        Self::with_ttl(user, crate::toast::TOAST_TTL)
    }

    pub fn with_ttl(user: &SessionUser, ttl: Duration) -> Self {
        Self {
            user_id: user.id,
            caps: Capabilities::for_user(user),
            foreground: true,
            has_new_activity: false,
            toasts: ToastQueue::new(ttl),
        }
    }

    pub fn on_event(&mut self, event: &ChangeEvent, now: Instant) -> Dispatch {
        match (&event.record, event.kind) {
            (ChangeRecord::Ticket(ticket), ChangeKind::Insert) => {
                let mut dispatch = Dispatch::refresh();
                if !self.foreground || self.caps.alert_on_foreground_tickets {
                    self.alert(
                        &mut dispatch,
                        AlertKind::Ticket,
                        format!("Assunto: {}", ticket.subject),
                        now,
                    );
                }
                dispatch
            }
            (ChangeRecord::Ticket(_), ChangeKind::Update) => Dispatch::refresh(),
            (ChangeRecord::Message(message), _) => {
                if message.author_id == self.user_id {
                    tracing::trace!(ticket_id = message.ticket_id, "suppressing own message");
                    return Dispatch::default();
                }
                let mut dispatch = Dispatch::refresh();
                self.alert(
                    &mut dispatch,
                    AlertKind::Message,
                    format!("Nova mensagem no ticket #{}", message.ticket_id),
                    now,
                );
                dispatch
            }
        }
    }

    fn alert(&mut self, dispatch: &mut Dispatch, kind: AlertKind, message: String, now: Instant) {
        self.has_new_activity = true;
        let toast = self.toasts.push(kind, message, now);
        tracing::debug!(user_id = self.user_id, toast = toast.id, ?kind, "alert raised");
        dispatch.toast = Some(toast);
        dispatch.cue = Some(NOTIFICATION_CUE);
    }

    pub fn set_foreground(&mut self, foreground: bool) {
        self.foreground = foreground;
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground
    }

    pub fn has_new_activity(&self) -> bool {
        self.has_new_activity
    }

    /// The ticket list was opened; clears the activity flag.
    pub fn tickets_viewed(&mut self) {
        self.has_new_activity = false;
    }

    pub fn dismiss(&mut self, toast_id: u64) -> bool {
        self.toasts.dismiss(toast_id)
    }

    pub fn sweep(&mut self, now: Instant) -> Vec<u64> {
        self.toasts.sweep(now)
    }

    pub fn next_expiry(&self) -> Option<Instant> {
        self.toasts.next_expiry()
    }

    pub fn toasts(&self) -> &[Toast] {
        self.toasts.active()
    }
}
