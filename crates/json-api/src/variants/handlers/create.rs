//! Create Variant Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazar_app::domain::products::models::{NewVariant, VariantUuid};

use crate::{
    extensions::*,
    products::{errors::into_status_error, responses::VarianteResponse},
    state::State,
};

/// Create Variant Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateVariantRequest {
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
    #[serde(default)]
    pub stock: i64,

    /// Excluded from amount-tier discounts when set
    #[serde(default)]
    pub bloqueo_descuento: bool,
}

/// Create Variant Handler
#[endpoint(
    tags("variantes"),
    summary = "Create Variant",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Variant created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown product or bad payload"),
        (status_code = StatusCode::CONFLICT, description = "Variant already exists"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<CreateVariantRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<VarianteResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.user_uuid_or_401()?;

    let request = json.into_inner();

    let created = state
        .app
        .products
        .create_variant(NewVariant {
            uuid: VariantUuid::new(),
            product_uuid: product.into_inner().into(),
            name: request.nombre,
            slug: request.slug,
            image_url: request.imagen_url,
            price: request.precio,
            stock: request.stock,
            discount_blocked: request.bloqueo_descuento,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/variantes/{}", created.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bazar_app::domain::products::{MockProductsService, ProductsServiceError};

    use crate::test_helpers::{make_variant, products_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        products_service(
            products,
            Router::with_path("productos/{product}/variantes").post(handler),
        )
    }

    #[tokio::test]
    async fn create_variant_returns_201() -> TestResult {
        let product = Uuid::now_v7();
        let variant = make_variant(product.into(), "Yerba mate 500g", 25_000);

        let mut products = MockProductsService::new();

        products
            .expect_create_variant()
            .once()
            .withf(move |new| {
                new.product_uuid.into_uuid() == product && new.price == 25_000
            })
            .return_once(move |_| Ok(variant));

        let mut res = TestClient::post(format!(
            "http://example.com/productos/{product}/variantes"
        ))
        .json(&json!({
            "nombre": "Yerba mate 500g",
            "slug": "yerba-mate-500g",
            "precio": 25_000,
            "stock": 40
        }))
        .send(&make_service(products))
        .await;

        let body: VarianteResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.precio, 25_000);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_returns_400() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_create_variant()
            .once()
            .return_once(|_| Err(ProductsServiceError::InvalidReference));

        let res = TestClient::post(format!(
            "http://example.com/productos/{}/variantes",
            Uuid::now_v7()
        ))
        .json(&json!({
            "nombre": "Huérfana",
            "slug": "huerfana",
            "precio": 1_000
        }))
        .send(&make_service(products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
