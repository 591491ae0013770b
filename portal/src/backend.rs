use db::models::tickets::TicketStatus;
use db::repositories::{
    Actor,
    ticket_repository::{TicketDetail, TicketSummary},
};
use services::{
    ServiceError,
    ticket_service::{NewMessage, TicketService},
};
use std::future::Future;

/// The ticket operations a conversation needs from storage.
pub trait TicketBackend: Send + Sync + 'static {
    fn get_ticket(
        &self,
        actor: Actor,
        ticket_id: i64,
    ) -> impl Future<Output = Result<TicketDetail, ServiceError>> + Send;

    fn list_tickets(
        &self,
        actor: Actor,
    ) -> impl Future<Output = Result<Vec<TicketSummary>, ServiceError>> + Send;

    fn append_message(
        &self,
        actor: Actor,
        ticket_id: i64,
        content: String,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;

    fn set_status(
        &self,
        actor: Actor,
        ticket_id: i64,
        status: TicketStatus,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

impl TicketBackend for TicketService {
    async fn get_ticket(&self, actor: Actor, ticket_id: i64) -> Result<TicketDetail, ServiceError> {
        TicketService::get_ticket(self, &actor, ticket_id).await
    }

    async fn list_tickets(&self, actor: Actor) -> Result<Vec<TicketSummary>, ServiceError> {
        TicketService::list_tickets(self, &actor).await
    }

    async fn append_message(
        &self,
        actor: Actor,
        ticket_id: i64,
        content: String,
    ) -> Result<(), ServiceError> {
        TicketService::append_message(self, &actor, ticket_id, NewMessage { content })
            .await
            .map(|_| ())
    }

    async fn set_status(
        &self,
        actor: Actor,
        ticket_id: i64,
        status: TicketStatus,
    ) -> Result<(), ServiceError> {
        TicketService::set_status(self, &actor, ticket_id, status)
            .await
            .map(|_| ())
    }
}
