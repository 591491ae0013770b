//! Controller for the ticket currently open in a session.
//!
//! The controller owns the in-memory snapshot of one ticket and its messages
//! and drives every mutation through the backend. It never merges pushed rows
//! into the snapshot: sends, confirmed status changes and feed events for the
//! ticket all end in a full refetch, so message order is always the
//! authoritative timestamp order.
//!
//! Status changes are optimistic. [`TicketConversation::begin_status_change`]
//! applies the target status locally and returns a [`PendingStatus`];
//! [`TicketConversation::complete_status_change`] either confirms it or puts
//! the previous status back. [`TicketConversation::change_status`] runs both
//! around the backend call.

use crate::backend::TicketBackend;
use crate::capabilities::Capabilities;
use crate::session::SessionUser;
use db::feed::ChangeEvent;
use db::models::tickets::TicketStatus;
use db::repositories::{Actor, ticket_repository::TicketDetail};
use serde::Serialize;
use services::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loading,
    Ready,
    Sending,
    StatusUpdating,
    /// Initial load failed and there is no snapshot to show.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversationError {
    #[error("No ticket loaded")]
    NoTicket,

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Ticket is closed")]
    TicketClosed,

    #[error("You are not allowed to change ticket status")]
    NotPermitted,

    #[error("Another operation is in progress ({0:?})")]
    Busy(Phase),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// An optimistic status change that has been applied locally but not yet
/// settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStatus {
    pub ticket_id: i64,
    pub previous: TicketStatus,
    pub target: TicketStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusTransition {
    Applying(PendingStatus),
    Confirmed(TicketStatus),
    RolledBack {
        restored: TicketStatus,
        error: ServiceError,
    },
}

pub struct TicketConversation<B> {
    backend: B,
    actor: Actor,
    caps: Capabilities,
    ticket_id: i64,
    ticket: Option<TicketDetail>,
    phase: Phase,
    draft: String,
    last_error: Option<ServiceError>,
    transition: Option<StatusTransition>,
}

impl<B: TicketBackend> TicketConversation<B> {
    pub fn new(backend: B, user: &SessionUser, ticket_id: i64) -> Self {
        Self {
            backend,
            actor: user.actor(),
            caps: Capabilities::for_user(user),
            ticket_id,
            ticket: None,
            phase: Phase::Loading,
            draft: String::new(),
            last_error: None,
            transition: None,
        }
    }

    pub fn ticket_id(&self) -> i64 {
        self.ticket_id
    }

    pub fn ticket(&self) -> Option<&TicketDetail> {
        self.ticket.as_ref()
    }

    pub fn status(&self) -> Option<TicketStatus> {
        self.ticket.as_ref().map(|t| t.ticket.status)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn last_error(&self) -> Option<&ServiceError> {
        self.last_error.as_ref()
    }

    pub fn last_transition(&self) -> Option<&StatusTransition> {
        self.transition.as_ref()
    }

    /// The send input is shown only for a loaded, non-closed ticket.
    pub fn can_send(&self) -> bool {
        self.ticket
            .as_ref()
            .is_some_and(|t| t.ticket.status != TicketStatus::Closed)
    }

    pub fn can_change_status(&self) -> bool {
        self.caps.can_change_status
    }

    /// Loads (or reloads) the ticket.
    ///
    /// With no snapshot to fall back to a failure moves to [`Phase::Error`];
    /// otherwise the previous snapshot stays and the error is recorded.
    pub async fn refresh(&mut self) -> Result<(), ConversationError> {
        match self.backend.get_ticket(self.actor, self.ticket_id).await {
            Ok(detail) => {
                self.ticket = Some(detail);
                self.phase = Phase::Ready;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(ticket_id = self.ticket_id, error = %err, "ticket refetch failed");
                self.phase = if self.ticket.is_some() {
                    Phase::Ready
                } else {
                    Phase::Error
                };
                self.last_error = Some(err.clone());
                Err(err.into())
            }
        }
    }

    /// Refetches if `event` concerns this ticket. Returns whether it did.
    pub async fn on_change(&mut self, event: &ChangeEvent) -> bool {
        if event.ticket_id() != self.ticket_id {
            return false;
        }
        if self.phase != Phase::Ready && self.phase != Phase::Error {
            // The running operation refetches when it settles.
            return false;
        }
        let _ = self.refresh().await;
        true
    }

    fn ensure_ready(&self) -> Result<(), ConversationError> {
        match self.phase {
            Phase::Ready => Ok(()),
            Phase::Loading | Phase::Error => Err(ConversationError::NoTicket),
            busy => Err(ConversationError::Busy(busy)),
        }
    }

    /// Sends the current draft.
    ///
    /// On success the draft is cleared and the ticket refetched; the sender's
    /// own message only becomes visible through that refetch. On failure the
    /// draft is kept for another attempt.
    pub async fn send_message(&mut self) -> Result<(), ConversationError> {
        if self.draft.trim().is_empty() {
            return Err(ConversationError::EmptyMessage);
        }
        self.ensure_ready()?;
        if !self.can_send() {
            return Err(ConversationError::TicketClosed);
        }

        self.phase = Phase::Sending;
        let content = self.draft.trim().to_string();

        if let Err(err) = self
            .backend
            .append_message(self.actor, self.ticket_id, content)
            .await
        {
            tracing::warn!(ticket_id = self.ticket_id, error = %err, "sending message failed");
            self.phase = Phase::Ready;
            self.last_error = Some(err.clone());
            return Err(err.into());
        }

        self.draft.clear();
        self.last_error = None;
        // The message is stored; a failed refetch is recorded but not returned.
        let _ = self.refresh().await;
        Ok(())
    }

    /// Applies `target` to the local snapshot before anything is persisted.
    pub fn begin_status_change(
        &mut self,
        target: TicketStatus,
    ) -> Result<PendingStatus, ConversationError> {
        if !self.caps.can_change_status {
            return Err(ConversationError::NotPermitted);
        }
        self.ensure_ready()?;
        let ticket = self.ticket.as_mut().ok_or(ConversationError::NoTicket)?;

        let pending = PendingStatus {
            ticket_id: self.ticket_id,
            previous: ticket.ticket.status,
            target,
        };
        ticket.ticket.status = target;
        self.phase = Phase::StatusUpdating;
        self.transition = Some(StatusTransition::Applying(pending));
        Ok(pending)
    }

    /// Settles `pending` with the outcome of the persistence call.
    ///
    /// A failure restores `pending.previous` before returning; the optimistic
    /// value never survives a failed write.
    pub fn complete_status_change(
        &mut self,
        pending: PendingStatus,
        outcome: Result<(), ServiceError>,
    ) -> StatusTransition {
        self.phase = Phase::Ready;

        let transition = match outcome {
            Ok(()) => {
                self.last_error = None;
                StatusTransition::Confirmed(pending.target)
            }
            Err(error) => {
                if let Some(ticket) = self.ticket.as_mut() {
                    ticket.ticket.status = pending.previous;
                }
                tracing::warn!(
                    ticket_id = pending.ticket_id,
                    from = %pending.previous,
                    to = %pending.target,
                    %error,
                    "status change rolled back"
                );
                self.last_error = Some(error.clone());
                StatusTransition::RolledBack {
                    restored: pending.previous,
                    error,
                }
            }
        };

        self.transition = Some(transition.clone());
        transition
    }

    /// Optimistically changes status, persists it, then confirms with a
    /// refetch or rolls back.
    pub async fn change_status(
        &mut self,
        target: TicketStatus,
    ) -> Result<StatusTransition, ConversationError> {
        let pending = self.begin_status_change(target)?;
        let outcome = self
            .backend
            .set_status(self.actor, self.ticket_id, target)
            .await;
        let transition = self.complete_status_change(pending, outcome);

        if matches!(transition, StatusTransition::Confirmed(_)) {
            // Picks up the authoritative updated_at.
            let _ = self.refresh().await;
        }
        Ok(transition)
    }
}
