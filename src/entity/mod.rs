pub mod tickets;

pub use tickets::Entity as Tickets;
