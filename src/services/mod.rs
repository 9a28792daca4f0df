pub mod event_service;
pub mod pricing;
pub mod qr;
pub mod ticket_id;
pub mod ticket_service;
pub mod ticket_store;
