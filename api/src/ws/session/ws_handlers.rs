use super::common::SessionIncoming;
use super::emit;
use super::payload::Tickets;
use db::feed::{ChangeEvent, Topic};
use db::models::tickets::TicketStatus;
use portal::{
    FeedClient, FeedHandle, NotificationDispatcher, SessionContext, SessionUser,
    TicketConversation,
};
use services::ticket_service::{TicketFilter, TicketService};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use util::config;
use util::state::AppState;
use util::ws::{WsContext, WsSession};

/// Feed events, tagged by which subscription delivered them.
enum Routed {
    List(ChangeEvent),
    Thread(ChangeEvent),
}

/// The open ticket and the subscriptions scoped to it.
struct OpenTicket {
    conv: TicketConversation<TicketService>,
    handles: Vec<FeedHandle>,
}

impl OpenTicket {
    async fn close(self) {
        for handle in self.handles {
            handle.unsubscribe().await;
        }
    }
}

pub struct PortalSession {
    state: AppState,
    session: SessionContext,
    user: SessionUser,
}

impl PortalSession {
    pub fn new(state: AppState, session: SessionContext, user: SessionUser) -> Self {
        Self {
            state,
            session,
            user,
        }
    }
}

/// Mutable per-socket state driven by the session loop.
struct Surface {
    ctx: WsContext,
    state: AppState,
    user: SessionUser,
    feed: FeedClient,
    routed_tx: mpsc::UnboundedSender<Routed>,
    dispatcher: NotificationDispatcher,
    open: Option<OpenTicket>,
}

impl Surface {
    async fn push_tickets(&self) -> bool {
        match self
            .state
            .tickets()
            .search_tickets(&self.user.actor(), &TicketFilter::default())
            .await
        {
            Ok(tickets) => emit::tickets(&self.ctx, Tickets { tickets }).await,
            Err(e) => {
                tracing::warn!(user_id = self.user.id, error = %e, "ticket list refresh failed");
                true
            }
        }
    }

    async fn on_list_event(&mut self, event: ChangeEvent) -> bool {
        let dispatch = self.dispatcher.on_event(&event, Instant::now());
        if dispatch.refresh_list && !self.push_tickets().await {
            return false;
        }
        if let Some(toast) = &dispatch.toast {
            if !emit::toast(&self.ctx, toast).await {
                return false;
            }
        }
        if let Some(cue) = &dispatch.cue {
            if !emit::cue(&self.ctx, cue).await {
                return false;
            }
        }
        if dispatch.is_alert() {
            return emit::activity(&self.ctx, true, None).await;
        }
        true
    }

    async fn on_thread_event(&mut self, event: ChangeEvent) -> bool {
        let Some(open) = self.open.as_mut() else {
            return true;
        };
        if !open.conv.on_change(&event).await {
            return true;
        }
        emit::ticket(&self.ctx, &open.conv).await
    }

    async fn open_ticket(&mut self, ticket_id: i64) -> bool {
        if let Some(previous) = self.open.take() {
            previous.close().await;
        }

        let mut handles = Vec::with_capacity(2);
        for topic in [Topic::Messages, Topic::Tickets] {
            let tx = self.routed_tx.clone();
            handles.push(
                self.feed
                    .subscribe_ticket(topic, ticket_id, move |ev| {
                        let _ = tx.send(Routed::Thread(ev));
                    })
                    .await,
            );
        }

        let mut conv = TicketConversation::new(self.state.tickets(), &self.user, ticket_id);
        let loaded = conv.refresh().await;
        let mut alive = emit::ticket(&self.ctx, &conv).await;
        if let Err(e) = loaded {
            alive = alive && emit::error(&self.ctx, &e).await;
        }
        self.open = Some(OpenTicket { conv, handles });
        alive
    }

    async fn close_ticket(&mut self) {
        if let Some(open) = self.open.take() {
            open.close().await;
        }
    }

    async fn view_tickets(&mut self) -> bool {
        self.dispatcher.tickets_viewed();
        let unread = match self.state.ledger().mark_checked(&self.user.actor()).await {
            Ok(_) => Some(0),
            Err(e) => {
                tracing::warn!(user_id = self.user.id, error = %e, "marking tickets checked failed");
                None
            }
        };
        self.push_tickets().await && emit::activity(&self.ctx, false, unread).await
    }

    async fn send_message(&mut self, content: String) -> bool {
        let Some(open) = self.open.as_mut() else {
            return emit::error(&self.ctx, &portal::ConversationError::NoTicket).await;
        };
        open.conv.set_draft(content);
        let result = open.conv.send_message().await;
        let mut alive = emit::ticket(&self.ctx, &open.conv).await;
        if let Err(e) = result {
            alive = alive && emit::error(&self.ctx, &e).await;
        }
        alive
    }

    async fn change_status(&mut self, target: TicketStatus) -> bool {
        let Some(open) = self.open.as_mut() else {
            return emit::error(&self.ctx, &portal::ConversationError::NoTicket).await;
        };

        let pending = match open.conv.begin_status_change(target) {
            Ok(pending) => pending,
            Err(e) => return emit::error(&self.ctx, &e).await,
        };
        // The optimistic value is on screen before the write starts.
        if !emit::status_applying(&self.ctx, &pending).await
            || !emit::ticket(&self.ctx, &open.conv).await
        {
            return false;
        }

        let outcome = self
            .state
            .tickets()
            .set_status(&self.user.actor(), pending.ticket_id, target)
            .await
            .map(|_| ());
        let transition = open.conv.complete_status_change(pending, outcome);
        if matches!(transition, portal::StatusTransition::Confirmed(_)) {
            let _ = open.conv.refresh().await;
        }

        emit::status_settled(&self.ctx, pending.ticket_id, &transition).await
            && emit::ticket(&self.ctx, &open.conv).await
    }

    /// Returns `false` once the client is gone or the session should end.
    async fn handle(&mut self, msg: SessionIncoming, session: &SessionContext) -> bool {
        match msg {
            SessionIncoming::OpenTicket { ticket_id } => self.open_ticket(ticket_id).await,
            SessionIncoming::CloseTicket => {
                self.close_ticket().await;
                true
            }
            SessionIncoming::ViewTickets => self.view_tickets().await,
            SessionIncoming::Visibility { foreground } => {
                self.dispatcher.set_foreground(foreground);
                true
            }
            SessionIncoming::Dismiss { id } => {
                if self.dispatcher.dismiss(id) {
                    emit::toast_dismissed(&self.ctx, id).await
                } else {
                    true
                }
            }
            SessionIncoming::SendMessage { content } => self.send_message(content).await,
            SessionIncoming::ChangeStatus { status } => self.change_status(status).await,
            SessionIncoming::SignOut => {
                session.sign_out();
                true
            }
        }
    }
}

impl WsSession for PortalSession {
    type In = SessionIncoming;

    async fn run(self, ctx: WsContext, mut inbound: mpsc::Receiver<SessionIncoming>) {
        let PortalSession {
            state,
            session,
            user,
        } = self;
        let mut session_rx = session.on_session_change();
        session_rx.borrow_and_update();

        let (routed_tx, mut routed_rx) = mpsc::unbounded_channel::<Routed>();
        let feed = FeedClient::new(state.feed().clone(), user.actor());

        let mut list_handles = Vec::with_capacity(2);
        for topic in [Topic::Tickets, Topic::Messages] {
            let tx = routed_tx.clone();
            list_handles.push(
                feed.subscribe(topic, move |ev| {
                    let _ = tx.send(Routed::List(ev));
                })
                .await,
            );
        }

        let unread = match state.ledger().get_unread_count(&user.actor()).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "unread count unavailable");
                0
            }
        };

        let mut surface = Surface {
            dispatcher: NotificationDispatcher::with_ttl(&user, config::toast_ttl()),
            ctx,
            state,
            user,
            feed,
            routed_tx,
            open: None,
        };

        tracing::info!(user_id = surface.user.id, role = %surface.user.role, "portal session opened");
        let mut alive = emit::ready(&surface.ctx, &surface.user, unread).await
            && surface.push_tickets().await;

        while alive {
            let deadline = surface.dispatcher.next_expiry();
            tokio::select! {
                msg = inbound.recv() => {
                    alive = match msg {
                        Some(msg) => surface.handle(msg, &session).await,
                        None => false,
                    };
                }
                Some(routed) = routed_rx.recv() => {
                    alive = match routed {
                        Routed::List(ev) => surface.on_list_event(ev).await,
                        Routed::Thread(ev) => surface.on_thread_event(ev).await,
                    };
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    for id in surface.dispatcher.sweep(Instant::now()) {
                        if !emit::toast_expired(&surface.ctx, id).await {
                            alive = false;
                            break;
                        }
                    }
                }
                changed = session_rx.changed() => {
                    if changed.is_err() || session_rx.borrow_and_update().is_none() {
                        let _ = surface.ctx.emit("session.ended", &()).await;
                        alive = false;
                    }
                }
            }
        }

        surface.close_ticket().await;
        for handle in list_handles {
            handle.unsubscribe().await;
        }
        tracing::info!(user_id = surface.user.id, "portal session closed");
        session.shutdown();
    }
}
