//! Session-side view of the change feed.
//!
//! Each subscription runs a small forwarding task that hands events to the
//! registered handler. Handles are revoked one at a time; revoking one never
//! touches another subscription of the same session.

use db::feed::{ChangeEvent, ChangeFeed, SubscriberId, Topic};
use db::repositories::Actor;
use tokio::task::JoinHandle;

/// Subscribes on behalf of one acting user. Events on rows the user cannot
/// see are dropped before they reach a handler.
#[derive(Clone)]
pub struct FeedClient {
    feed: ChangeFeed,
    actor: Actor,
}

impl FeedClient {
    pub fn new(feed: ChangeFeed, actor: Actor) -> Self {
        Self { feed, actor }
    }

    /// Every visible event on `topic`.
    pub async fn subscribe<F>(&self, topic: Topic, handler: F) -> FeedHandle
    where
        F: FnMut(ChangeEvent) + Send + 'static,
    {
        let sub = self.feed.subscribe(topic).await;
        self.spawn(sub, handler)
    }

    /// Visible events on `topic` for one ticket.
    pub async fn subscribe_ticket<F>(&self, topic: Topic, ticket_id: i64, handler: F) -> FeedHandle
    where
        F: FnMut(ChangeEvent) + Send + 'static,
    {
        let sub = self.feed.subscribe_ticket(topic, ticket_id).await;
        self.spawn(sub, handler)
    }

    fn spawn<F>(&self, mut sub: db::feed::Subscription, mut handler: F) -> FeedHandle
    where
        F: FnMut(ChangeEvent) + Send + 'static,
    {
        let id = sub.id();
        let topic = sub.topic();
        let actor = self.actor;

        let task = tokio::spawn(async move {
            while let Some(event) = sub.recv().await {
                if event.visible_to(&actor) {
                    handler(event);
                }
            }
            tracing::debug!(subscriber = id, ?topic, "feed subscription ended");
        });

        FeedHandle {
            id,
            topic,
            feed: self.feed.clone(),
            task,
        }
    }
}

/// A live subscription. Dropping it stops delivery.
pub struct FeedHandle {
    id: SubscriberId,
    topic: Topic,
    feed: ChangeFeed,
    task: JoinHandle<()>,
}

impl FeedHandle {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Revokes the registration and stops the forwarding task. Events already
    /// in flight may or may not reach the handler.
    pub async fn unsubscribe(self) {
        self.feed.unsubscribe(self.topic, self.id).await;
        self.task.abort();
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
