//! List Discounts Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    discounts::{errors::into_status_error, requests::DescuentoResponse},
    extensions::*,
    state::State,
};

/// List Discounts Handler
#[endpoint(
    tags("descuentos"),
    summary = "List Discounts",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<DescuentoResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let discounts = state
        .app
        .discounts
        .list_discounts(point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(
        discounts.into_iter().map(DescuentoResponse::from).collect(),
    ))
}
