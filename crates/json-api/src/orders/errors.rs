//! Errors

use salvo::http::StatusError;
use tracing::error;

use bazar_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::EmptyCart => {
            StatusError::bad_request().brief("El carrito está vacío")
        }
        OrdersServiceError::InsufficientStock => {
            StatusError::conflict().brief("Stock insuficiente")
        }
        OrdersServiceError::InvalidTransition => {
            StatusError::conflict().brief("Transición de estado no permitida")
        }
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Pricing(source) => {
            error!("failed to price cart for order: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::NotFound => StatusError::not_found(),
    }
}
