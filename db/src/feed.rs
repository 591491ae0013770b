//! Row-level change feed for tickets and ticket messages.
//!
//! Every successful write made through the ticket repository is published here
//! as a [`ChangeEvent`]. Listeners register per topic and get their own
//! unbounded channel, keyed by a subscriber id so each registration can be
//! revoked on its own.
//!
//! Delivery is best-effort: a listener whose receiver is gone is pruned on the
//! next publish and nothing is replayed to late subscribers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, mpsc};

use crate::models::{ticket_messages, tickets, tickets::TicketStatus};
use crate::repositories::Actor;

pub type SubscriberId = u64;

/// The two record kinds the feed watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Any ticket inserted or updated.
    Tickets,
    /// Any ticket message inserted.
    Messages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
}

/// Partial `tickets` row carried by a change event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketRecord {
    pub id: i64,
    pub client_id: i64,
    pub subject: String,
    pub status: TicketStatus,
    pub updated_at: DateTime<Utc>,
}

impl From<&tickets::Model> for TicketRecord {
    fn from(model: &tickets::Model) -> Self {
        Self {
            id: model.id,
            client_id: model.client_id,
            subject: model.subject.clone(),
            status: model.status,
            updated_at: model.updated_at,
        }
    }
}

/// Partial `ticket_messages` row carried by a change event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRecord {
    pub id: i64,
    pub ticket_id: i64,
    pub author_id: i64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&ticket_messages::Model> for MessageRecord {
    fn from(model: &ticket_messages::Model) -> Self {
        Self {
            id: model.id,
            ticket_id: model.ticket_id,
            author_id: model.author_id,
            content: model.content.clone(),
            timestamp: model.timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "table", content = "row", rename_all = "snake_case")]
pub enum ChangeRecord {
    Ticket(TicketRecord),
    Message(MessageRecord),
}

/// A transient notification about one written row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub record: ChangeRecord,
    /// Profile that performed the write, when known.
    pub originator_id: Option<i64>,
    /// Client owning the ticket the row belongs to. Drives row-level
    /// visibility for client sessions.
    pub owner_id: i64,
}

impl ChangeEvent {
    pub fn ticket(kind: ChangeKind, model: &tickets::Model, originator_id: Option<i64>) -> Self {
        Self {
            kind,
            record: ChangeRecord::Ticket(model.into()),
            originator_id,
            owner_id: model.client_id,
        }
    }

    pub fn message_inserted(model: &ticket_messages::Model, owner_id: i64) -> Self {
        Self {
            kind: ChangeKind::Insert,
            record: ChangeRecord::Message(model.into()),
            originator_id: Some(model.author_id),
            owner_id,
        }
    }

    /// Employees see every event, clients only those on their own tickets.
    pub fn visible_to(&self, actor: &Actor) -> bool {
        actor.is_employee() || self.owner_id == actor.id
    }

    pub fn topic(&self) -> Topic {
        match self.record {
            ChangeRecord::Ticket(_) => Topic::Tickets,
            ChangeRecord::Message(_) => Topic::Messages,
        }
    }

    /// Id of the ticket this event concerns.
    pub fn ticket_id(&self) -> i64 {
        match &self.record {
            ChangeRecord::Ticket(t) => t.id,
            ChangeRecord::Message(m) => m.ticket_id,
        }
    }
}

struct Registration {
    ticket_id: Option<i64>,
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

impl Registration {
    fn wants(&self, event: &ChangeEvent) -> bool {
        self.ticket_id.is_none_or(|id| id == event.ticket_id())
    }
}

/// Shared registry of change listeners, cheap to clone.
#[derive(Clone, Default)]
pub struct ChangeFeed {
    inner: Arc<RwLock<HashMap<Topic, HashMap<SubscriberId, Registration>>>>,
    next_id: Arc<AtomicU64>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for every event on `topic`.
    pub async fn subscribe(&self, topic: Topic) -> Subscription {
        self.register(topic, None).await
    }

    /// Registers a listener for events on `topic` that concern `ticket_id` only.
    pub async fn subscribe_ticket(&self, topic: Topic, ticket_id: i64) -> Subscription {
        self.register(topic, Some(ticket_id)).await
    }

    async fn register(&self, topic: Topic, ticket_id: Option<i64>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = mpsc::unbounded_channel();

        let mut map = self.inner.write().await;
        map.entry(topic)
            .or_default()
            .insert(id, Registration { ticket_id, tx });

        tracing::debug!(subscriber = id, ?topic, ?ticket_id, "change feed subscription added");

        Subscription {
            id,
            topic,
            feed: self.clone(),
            rx,
        }
    }

    /// Removes a registration. Unknown ids are ignored.
    pub async fn unsubscribe(&self, topic: Topic, id: SubscriberId) {
        let mut map = self.inner.write().await;
        if let Some(subs) = map.get_mut(&topic) {
            if subs.remove(&id).is_some() {
                tracing::debug!(subscriber = id, ?topic, "change feed subscription removed");
            }
            if subs.is_empty() {
                map.remove(&topic);
            }
        }
    }

    /// Delivers `event` to every matching listener and returns how many got it.
    pub async fn publish(&self, event: ChangeEvent) -> usize {
        let topic = event.topic();
        let mut map = self.inner.write().await;
        let Some(subs) = map.get_mut(&topic) else {
            return 0;
        };

        let mut delivered = 0;
        let mut closed = Vec::new();
        for (id, reg) in subs.iter() {
            if !reg.wants(&event) {
                continue;
            }
            match reg.tx.send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => closed.push(*id),
            }
        }

        for id in closed {
            tracing::debug!(subscriber = id, ?topic, "pruning closed change feed listener");
            subs.remove(&id);
        }
        if subs.is_empty() {
            map.remove(&topic);
        }

        delivered
    }

    pub async fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner
            .read()
            .await
            .get(&topic)
            .map(HashMap::len)
            .unwrap_or(0)
    }
}

/// One registration on the feed.
///
/// Dropping a subscription closes its channel; the registry entry is pruned on
/// the next publish. Call [`Subscription::unsubscribe`] to revoke it at once.
pub struct Subscription {
    id: SubscriberId,
    topic: Topic,
    feed: ChangeFeed,
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Waits for the next event. `None` once the subscription is revoked.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }

    /// Removes the registration. Events already queued are discarded.
    pub async fn unsubscribe(mut self) {
        self.feed.unsubscribe(self.topic, self.id).await;
        self.rx.close();
    }
}
