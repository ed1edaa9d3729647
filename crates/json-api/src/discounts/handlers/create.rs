//! Create Discount Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    discounts::{
        errors::into_status_error,
        requests::{CreateDiscountRequest, DescuentoResponse},
    },
    extensions::*,
    state::State,
};

/// Create Discount Handler
#[endpoint(
    tags("descuentos"),
    summary = "Create Discount",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Discount created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "Discount already exists"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateDiscountRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DescuentoResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.user_uuid_or_401()?;

    let new_discount = json.into_inner().into_new_discount()?;

    let created = state
        .app
        .discounts
        .create_discount(new_discount)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/descuentos/{}", created.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use uuid::Uuid;

    use bazar_app::domain::discounts::{
        DiscountsServiceError, MockDiscountsService, models::NewDiscount,
    };

    use crate::test_helpers::{discounts_service, make_amount_discount};

    use super::*;

    fn make_service(discounts: MockDiscountsService) -> Service {
        discounts_service(discounts, Router::with_path("descuentos").post(handler))
    }

    #[tokio::test]
    async fn create_amount_discount_returns_201() -> TestResult {
        let discount = make_amount_discount(0, 100_000, 10);

        let mut discounts = MockDiscountsService::new();

        discounts
            .expect_create_discount()
            .once()
            .withf(|new| {
                matches!(
                    new,
                    NewDiscount::Amount {
                        amount_from: 0,
                        amount_to: 100_000,
                        ..
                    }
                )
            })
            .return_once(move |_| Ok(discount));

        let mut res = TestClient::post("http://example.com/descuentos")
            .json(&json!({
                "tipo": "IMPORTE",
                "valor": 10,
                "cantDesde": 0,
                "cantHasta": 100_000,
                "fechaDesde": "2026-01-01",
                "fechaHasta": "2026-12-31"
            }))
            .send(&make_service(discounts))
            .await;

        let body: DescuentoResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.tipo, "IMPORTE");
        assert_eq!(body.cant_hasta, Some(100_000));

        Ok(())
    }

    #[tokio::test]
    async fn product_discount_without_variant_returns_400() -> TestResult {
        let mut discounts = MockDiscountsService::new();

        discounts.expect_create_discount().never();

        let res = TestClient::post("http://example.com/descuentos")
            .json(&json!({
                "tipo": "PRODUCTO",
                "valor": 15,
                "fechaDesde": "2026-01-01",
                "fechaHasta": "2026-12-31"
            }))
            .send(&make_service(discounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_tipo_returns_400() -> TestResult {
        let mut discounts = MockDiscountsService::new();

        discounts.expect_create_discount().never();

        let res = TestClient::post("http://example.com/descuentos")
            .json(&json!({
                "tipo": "CUPON",
                "varianteId": Uuid::now_v7(),
                "valor": 15,
                "fechaDesde": "2026-01-01",
                "fechaHasta": "2026-12-31"
            }))
            .send(&make_service(discounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn invalid_percent_returns_400() -> TestResult {
        let mut discounts = MockDiscountsService::new();

        discounts
            .expect_create_discount()
            .once()
            .return_once(|_| Err(DiscountsServiceError::InvalidData));

        let res = TestClient::post("http://example.com/descuentos")
            .json(&json!({
                "tipo": "IMPORTE",
                "valor": 150,
                "cantDesde": 0,
                "cantHasta": 100_000,
                "fechaDesde": "2026-01-01",
                "fechaHasta": "2026-12-31"
            }))
            .send(&make_service(discounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
