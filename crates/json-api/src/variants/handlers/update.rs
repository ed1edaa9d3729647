//! Update Variant Handler

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

use bazar_app::domain::products::models::VariantUpdate;

use crate::{
    extensions::*,
    products::{errors::into_status_error, responses::VarianteResponse},
    state::State,
};

/// Update Variant Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateVariantRequest {
    /// Variant display name
    pub nombre: String,

    /// Variant URL slug
    pub slug: String,

    /// Variant image URL
    #[serde(default)]
    pub imagen_url: String,

    /// Unit price in guaraníes
    pub precio: u64,

    /// Units in stock
    pub stock: i64,

    /// Excluded from amount-tier discounts when set
    pub bloqueo_descuento: bool,

    /// Whether the variant is purchasable
    pub activo: bool,
}

impl From<UpdateVariantRequest> for VariantUpdate {
    fn from(request: UpdateVariantRequest) -> Self {
        Self {
            name: request.nombre,
            slug: request.slug,
            image_url: request.imagen_url,
            price: request.precio,
            stock: request.stock,
            discount_blocked: request.bloqueo_descuento,
            active: request.activo,
        }
    }
}

/// Update Variant Handler
///
/// Price, stock and flag changes take effect on the next cart read; carts
/// never freeze prices.
#[endpoint(
    tags("variantes"),
    summary = "Update Variant",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    variant: PathParam<Uuid>,
    json: JsonBody<UpdateVariantRequest>,
    depot: &mut Depot,
) -> Result<Json<VarianteResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.user_uuid_or_401()?;

    let updated = state
        .app
        .products
        .update_variant(variant.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}
