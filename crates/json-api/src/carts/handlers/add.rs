//! Add Cart Item Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazar_app::domain::carts::models::{CartItemUuid, NewCartItem};

use crate::{
    carts::{errors::into_status_error, responses::CartPayload},
    extensions::*,
    state::State,
};

/// Add Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddItemRequest {
    /// Variant to add
    pub variante_id: Uuid,

    /// Quantity to add; defaults to 1
    pub cantidad: Option<u32>,
}

impl From<AddItemRequest> for NewCartItem {
    fn from(request: AddItemRequest) -> Self {
        Self {
            uuid: CartItemUuid::new(),
            variant_uuid: request.variante_id.into(),
            quantity: request.cantidad.unwrap_or(1),
        }
    }
}

/// Add Item Handler
///
/// Adds a variant to the caller's cart (or increments the existing line) and
/// returns the re-priced cart.
#[endpoint(
    tags("carrito"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::OK, description = "Item added, cart re-priced"),
        (status_code = StatusCode::NOT_FOUND, description = "Variant not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Variant unavailable or bad payload"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartPayload>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.cart_owner_or_500()?;

    let priced = state
        .app
        .carts
        .add_item(owner, json.into_inner().into(), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(priced.into()))
}
