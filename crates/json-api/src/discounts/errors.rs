//! Errors

use salvo::http::StatusError;
use tracing::error;

use bazar_app::domain::discounts::DiscountsServiceError;

pub(crate) fn into_status_error(error: DiscountsServiceError) -> StatusError {
    match error {
        DiscountsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Discount already exists")
        }
        DiscountsServiceError::InvalidReference
        | DiscountsServiceError::MissingRequiredData
        | DiscountsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid discount payload")
        }
        DiscountsServiceError::Sql(source) => {
            error!("discount storage error: {source}");

            StatusError::internal_server_error()
        }
        DiscountsServiceError::NotFound => StatusError::not_found(),
    }
}
