//! Clear Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Cleared Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartClearedResponse {
    /// Outcome message
    pub mensaje: String,
}

/// Clear Cart Handler
///
/// Removes every line from the caller's cart. Clearing a cart that was never
/// created succeeds.
#[endpoint(tags("carrito"), summary = "Clear Cart")]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<CartClearedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.cart_owner_or_500()?;

    state
        .app
        .carts
        .clear(owner)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartClearedResponse {
        mensaje: "Carrito vaciado exitosamente".to_string(),
    }))
}
