//! Orders
//!
//! Order placement consumes the priced cart: one transaction locks each
//! variant's stock row, decrements it, snapshots the priced lines as order
//! items and empties the cart. Insufficient stock aborts the whole
//! transaction.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
