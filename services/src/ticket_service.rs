use crate::error::{not_blank, ServiceError, ServiceResult};
use db::{
    feed::ChangeFeed,
    models::{
        profile::{Model as Profile, Role},
        ticket_messages::Model as TicketMessage,
        tickets::{Model as Ticket, TicketStatus},
    },
    repositories::{
        profile_repository::ProfileRepository,
        ticket_repository::{TicketDetail, TicketRepository, TicketSummary},
        Actor,
    },
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTicket {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "must be at most 200 characters")
    )]
    pub subject: String,

    #[validate(custom(function = "not_blank"))]
    pub message: String,

    /// Owning client. Ignored for clients, required for employees.
    pub client_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMessage {
    #[validate(custom(function = "not_blank"))]
    pub content: String,
}

/// List filters matching the ticket board's search box and status tabs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    /// Case-insensitive match on subject or client name.
    pub query: Option<String>,
}

impl TicketFilter {
    fn matches(&self, ticket: &TicketSummary) -> bool {
        if self.status.is_some_and(|s| s != ticket.status) {
            return false;
        }
        match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                ticket.subject.to_lowercase().contains(&q)
                    || ticket.client_name.to_lowercase().contains(&q)
            }
            _ => true,
        }
    }
}

/// Ticket operations with input validation and error mapping on top of the
/// role-scoped repository.
#[derive(Clone)]
pub struct TicketService {
    tickets: TicketRepository,
    profiles: ProfileRepository,
}

impl TicketService {
    pub fn new(db: DatabaseConnection, feed: ChangeFeed) -> Self {
        Self {
            tickets: TicketRepository::new(db.clone(), feed),
            profiles: ProfileRepository::new(db),
        }
    }

    pub async fn list_tickets(&self, actor: &Actor) -> ServiceResult<Vec<TicketSummary>> {
        Ok(self.tickets.list_tickets(actor).await?)
    }

    pub async fn search_tickets(
        &self,
        actor: &Actor,
        filter: &TicketFilter,
    ) -> ServiceResult<Vec<TicketSummary>> {
        let tickets = self.list_tickets(actor).await?;
        Ok(tickets.into_iter().filter(|t| filter.matches(t)).collect())
    }

    pub async fn get_ticket(&self, actor: &Actor, ticket_id: i64) -> ServiceResult<TicketDetail> {
        Ok(self.tickets.get_ticket(actor, ticket_id).await?)
    }

    /// Opens a ticket with its first message.
    ///
    /// Clients always open tickets for themselves. Employees open them on
    /// behalf of an existing client and are recorded as the first author.
    pub async fn create_ticket(&self, actor: &Actor, input: NewTicket) -> ServiceResult<Ticket> {
        input.validate()?;

        let client_id = if actor.is_employee() {
            let id = input.client_id.ok_or_else(|| {
                ServiceError::Validation("client_id: required when opening a ticket for a client".into())
            })?;
            let client = self.profiles.find_by_id(id).await?;
            if client.role != Role::Client {
                return Err(ServiceError::Validation(format!(
                    "client_id: profile {id} is not a client"
                )));
            }
            id
        } else {
            actor.id
        };

        let ticket = self
            .tickets
            .create_ticket(input.subject.trim(), input.message.trim(), client_id, actor.id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, client_id, "ticket creation failed"))?;

        tracing::info!(ticket_id = ticket.id, client_id, author_id = actor.id, "ticket opened");
        Ok(ticket)
    }

    pub async fn append_message(
        &self,
        actor: &Actor,
        ticket_id: i64,
        input: NewMessage,
    ) -> ServiceResult<TicketMessage> {
        input.validate()?;
        Ok(self
            .tickets
            .append_message(actor, ticket_id, input.content.trim())
            .await?)
    }

    pub async fn set_status(
        &self,
        actor: &Actor,
        ticket_id: i64,
        status: TicketStatus,
    ) -> ServiceResult<Ticket> {
        if !actor.is_employee() {
            return Err(ServiceError::Forbidden(
                "Only employees can change ticket status".into(),
            ));
        }
        let ticket = self.tickets.set_status(actor, ticket_id, status).await?;
        tracing::info!(ticket_id, %status, by = actor.id, "ticket status changed");
        Ok(ticket)
    }

    pub async fn list_clients(&self, actor: &Actor) -> ServiceResult<Vec<Profile>> {
        if !actor.is_employee() {
            return Err(ServiceError::Forbidden("Only employees can list clients".into()));
        }
        Ok(self.profiles.list_clients(actor).await?)
    }
}
