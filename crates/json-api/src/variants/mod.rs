//! Variant admin surface.

pub(crate) mod handlers;

pub(crate) use handlers::*;
