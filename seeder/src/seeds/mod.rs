pub mod profiles;
pub mod tickets;
