//! Browser-side state of the storefront: the merchandise cart persisted in
//! local storage and the ticket purchase form. Host independent; storage and
//! HTTP transport are supplied by the caller.

pub mod api;
pub mod cart;
pub mod purchase_form;
pub mod storage;
