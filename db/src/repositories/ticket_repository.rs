//! Role-scoped ticket and message persistence.
//!
//! Clients only ever match rows where `client_id` is their own id; a ticket
//! outside that scope reads as `RecordNotFound`, exactly like a missing one.
//! Every successful write is published on the [`ChangeFeed`].
//!
//! Ticket creation (ticket row, then first message) and message append
//! (message row, then ticket bump) are two sequential writes with no
//! compensating transaction. A failure between them leaves a ticket without
//! its first message or a message whose ticket was not bumped.

use crate::feed::{ChangeEvent, ChangeFeed, ChangeKind};
use crate::models::{
    profile,
    ticket_messages::{self, Entity as MessageEntity},
    tickets::{self, Column, Entity, TicketStatus},
};
use crate::repositories::Actor;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select,
};
use serde::Serialize;

pub const UNKNOWN_CLIENT: &str = "Cliente Desconhecido";
pub const UNKNOWN_AUTHOR: &str = "Usuário Desconhecido";

/// List-view projection of a ticket (no messages).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketSummary {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub subject: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketSummary {
    fn from_row(ticket: tickets::Model, client: Option<profile::Model>) -> Self {
        Self {
            id: ticket.id,
            client_id: ticket.client_id,
            client_name: client
                .map(|c| c.name)
                .unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
            subject: ticket.subject,
            status: ticket.status,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

/// A message with its author's name resolved at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    pub id: i64,
    pub ticket_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A ticket together with its full conversation, oldest message first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketDetail {
    #[serde(flatten)]
    pub ticket: TicketSummary,
    pub messages: Vec<MessageView>,
}

#[derive(Clone)]
pub struct TicketRepository {
    db: DatabaseConnection,
    feed: ChangeFeed,
}

impl TicketRepository {
    pub fn new(db: DatabaseConnection, feed: ChangeFeed) -> Self {
        Self { db, feed }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    fn scoped(query: Select<Entity>, actor: &Actor) -> Select<Entity> {
        if actor.is_employee() {
            query
        } else {
            query.filter(Column::ClientId.eq(actor.id))
        }
    }

    async fn find_visible(&self, actor: &Actor, ticket_id: i64) -> Result<tickets::Model, DbErr> {
        Self::scoped(Entity::find_by_id(ticket_id), actor)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Ticket {ticket_id} not found")))
    }

    /// Tickets visible to `actor`, most recently updated first.
    pub async fn list_tickets(&self, actor: &Actor) -> Result<Vec<TicketSummary>, DbErr> {
        let rows = Self::scoped(Entity::find(), actor)
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .find_also_related(profile::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(ticket, client)| TicketSummary::from_row(ticket, client))
            .collect())
    }

    pub async fn get_ticket(&self, actor: &Actor, ticket_id: i64) -> Result<TicketDetail, DbErr> {
        let ticket = self.find_visible(actor, ticket_id).await?;
        let client = profile::Entity::find_by_id(ticket.client_id)
            .one(&self.db)
            .await?;

        // Equal timestamps fall back to insertion order.
        let messages = MessageEntity::find()
            .filter(ticket_messages::Column::TicketId.eq(ticket_id))
            .order_by_asc(ticket_messages::Column::Timestamp)
            .order_by_asc(ticket_messages::Column::Id)
            .find_also_related(profile::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(m, author)| MessageView {
                id: m.id,
                ticket_id: m.ticket_id,
                author_id: m.author_id,
                author_name: author
                    .map(|a| a.name)
                    .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
                content: m.content,
                timestamp: m.timestamp,
            })
            .collect();

        Ok(TicketDetail {
            ticket: TicketSummary::from_row(ticket, client),
            messages,
        })
    }

    /// Inserts an `Aberto` ticket for `client_id`, then its first message.
    pub async fn create_ticket(
        &self,
        subject: &str,
        first_message: &str,
        client_id: i64,
        author_id: i64,
    ) -> Result<tickets::Model, DbErr> {
        let now = Utc::now();
        let ticket = tickets::ActiveModel {
            client_id: Set(client_id),
            subject: Set(subject.to_owned()),
            status: Set(TicketStatus::Open),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.feed
            .publish(ChangeEvent::ticket(ChangeKind::Insert, &ticket, Some(author_id)))
            .await;

        let message = ticket_messages::ActiveModel {
            ticket_id: Set(ticket.id),
            author_id: Set(author_id),
            content: Set(first_message.to_owned()),
            timestamp: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.feed
            .publish(ChangeEvent::message_inserted(&message, client_id))
            .await;

        Ok(ticket)
    }

    /// Inserts a message, then bumps the ticket to `Em Andamento`.
    ///
    /// The status is forced regardless of its current value, Closed included.
    pub async fn append_message(
        &self,
        actor: &Actor,
        ticket_id: i64,
        content: &str,
    ) -> Result<ticket_messages::Model, DbErr> {
        let ticket = self.find_visible(actor, ticket_id).await?;
        let now = Utc::now();

        let message = ticket_messages::ActiveModel {
            ticket_id: Set(ticket_id),
            author_id: Set(actor.id),
            content: Set(content.to_owned()),
            timestamp: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.feed
            .publish(ChangeEvent::message_inserted(&message, ticket.client_id))
            .await;

        self.write_status(ticket, TicketStatus::InProgress, now, actor.id)
            .await?;

        Ok(message)
    }

    pub async fn set_status(
        &self,
        actor: &Actor,
        ticket_id: i64,
        status: TicketStatus,
    ) -> Result<tickets::Model, DbErr> {
        let ticket = self.find_visible(actor, ticket_id).await?;
        self.write_status(ticket, status, Utc::now(), actor.id).await
    }

    async fn write_status(
        &self,
        ticket: tickets::Model,
        status: TicketStatus,
        at: DateTime<Utc>,
        originator_id: i64,
    ) -> Result<tickets::Model, DbErr> {
        // updated_at never moves backwards, even if the clock does.
        let updated_at = at.max(ticket.updated_at);

        let mut active: tickets::ActiveModel = ticket.into();
        active.status = Set(status);
        active.updated_at = Set(updated_at);
        let updated = active.update(&self.db).await?;

        self.feed
            .publish(ChangeEvent::ticket(ChangeKind::Update, &updated, Some(originator_id)))
            .await;

        Ok(updated)
    }

    /// Tickets visible to `actor` updated strictly after `since`.
    pub async fn count_updated_since(
        &self,
        actor: &Actor,
        since: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        Self::scoped(Entity::find(), actor)
            .filter(Column::UpdatedAt.gt(since))
            .count(&self.db)
            .await
    }
}
