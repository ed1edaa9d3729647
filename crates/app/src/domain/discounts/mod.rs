//! Discounts
//!
//! Administration of discount records plus the two read-side lookups the cart
//! pricing flow runs: active per-variant discounts for a set of variants, and
//! the best amount-tier discount for an eligible subtotal.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::DiscountsServiceError;
pub use service::*;
