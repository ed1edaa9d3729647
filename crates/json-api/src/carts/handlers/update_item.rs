//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Update Quantity Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateQuantityRequest {
    /// New quantity; must be at least 1
    pub cantidad: u32,
}

/// Quantity Updated Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct QuantityUpdatedResponse {
    /// Updated cart item UUID
    pub id: Uuid,

    /// New quantity
    pub cantidad: u32,
}

/// Update Cart Item Handler
///
/// Sets a line's quantity within the caller's cart.
#[endpoint(
    tags("carrito"),
    summary = "Update Item Quantity",
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateQuantityRequest>,
    depot: &mut Depot,
) -> Result<Json<QuantityUpdatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.cart_owner_or_500()?;

    let updated = state
        .app
        .carts
        .set_quantity(owner, item.into_inner().into(), json.into_inner().cantidad)
        .await
        .map_err(into_status_error)?;

    Ok(Json(QuantityUpdatedResponse {
        id: updated.uuid.into_uuid(),
        cantidad: updated.quantity,
    }))
}
