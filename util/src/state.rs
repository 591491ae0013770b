//! Application state shared across Axum route handlers and websocket sessions.

use crate::ws::SessionRegistry;
use db::feed::ChangeFeed;
use sea_orm::DatabaseConnection;
use services::{
    auth_service::AuthService, ledger_service::LedgerService, ticket_service::TicketService,
};

/// Central application state.
///
/// Holds the database pool, the change feed every write is published on, and
/// the registry of live websocket sessions. Services are cheap to build, so
/// handlers construct them per request from here.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    feed: ChangeFeed,
    sessions: SessionRegistry,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            feed: ChangeFeed::new(),
            sessions: SessionRegistry::new(),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn tickets(&self) -> TicketService {
        TicketService::new(self.db.clone(), self.feed.clone())
    }

    pub fn ledger(&self) -> LedgerService {
        LedgerService::new(self.db.clone(), self.feed.clone())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.db.clone())
    }
}
