//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        responses::{ProductoDetalleResponse, ProductoResponse, VarianteResponse},
    },
    state::State,
};

/// Get Product Handler
///
/// Returns a product together with its variants.
#[endpoint(
    tags("productos"),
    summary = "Get Product",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductoDetalleResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let product_uuid = product.into_inner().into();

    let product = state
        .app
        .products
        .get_product(product_uuid, point_in_time)
        .await
        .map_err(into_status_error)?;

    let variants = state
        .app
        .products
        .list_variants(product_uuid, point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductoDetalleResponse {
        producto: ProductoResponse::from(product),
        variantes: variants.into_iter().map(VarianteResponse::from).collect(),
    }))
}
