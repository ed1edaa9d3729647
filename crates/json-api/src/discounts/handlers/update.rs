//! Update Discount Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    discounts::{
        errors::into_status_error,
        requests::{DescuentoResponse, UpdateDiscountRequest},
    },
    extensions::*,
    state::State,
};

/// Update Discount Handler
#[endpoint(
    tags("descuentos"),
    summary = "Update Discount",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    discount: PathParam<Uuid>,
    json: JsonBody<UpdateDiscountRequest>,
    depot: &mut Depot,
) -> Result<Json<DescuentoResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.user_uuid_or_401()?;

    let update = json.into_inner().into_update()?;

    let updated = state
        .app
        .discounts
        .update_discount(discount.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}
