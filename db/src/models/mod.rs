pub mod profile;
pub mod ticket_messages;
pub mod tickets;

pub use profile::Entity as Profile;
pub use ticket_messages::Entity as TicketMessage;
pub use tickets::Entity as Ticket;
