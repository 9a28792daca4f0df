pub mod events;
pub mod tickets;
