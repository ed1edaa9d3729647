//! Auth
//!
//! Bearer API tokens resolve to user identities for cart ownership and admin
//! calls. Tokens are stored as SHA-256 hashes; raw tokens are only ever shown
//! once, at issuance.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::AuthServiceError;
pub use service::*;
