pub mod auth_service;
pub mod error;
pub mod ledger_service;
pub mod ticket_service;

pub use error::ServiceError;
