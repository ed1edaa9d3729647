//! Carts
//!
//! Cart rows persist only ownership and quantities. Every read re-prices the
//! cart from the live variant rows and the discount records current at the
//! requested point in time; nothing derived is ever stored.

pub mod errors;
pub mod models;
pub(crate) mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;
