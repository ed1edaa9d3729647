//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use bazar::discounts::PricingError;

use crate::domain::carts::CartsServiceError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("cart has no items")]
    EmptyCart,

    #[error("insufficient stock for variant")]
    InsufficientStock,

    #[error("illegal order status transition")]
    InvalidTransition,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("cart could not be priced")]
    Pricing(#[from] PricingError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<CartsServiceError> for OrdersServiceError {
    fn from(error: CartsServiceError) -> Self {
        match error {
            CartsServiceError::NotFound => Self::NotFound,
            CartsServiceError::AlreadyExists => Self::AlreadyExists,
            CartsServiceError::InvalidReference => Self::InvalidReference,
            CartsServiceError::MissingRequiredData => Self::MissingRequiredData,
            CartsServiceError::InvalidData | CartsServiceError::InactiveVariant => {
                Self::InvalidData
            }
            CartsServiceError::Pricing(source) => Self::Pricing(source),
            CartsServiceError::Sql(source) => Self::Sql(source),
        }
    }
}
