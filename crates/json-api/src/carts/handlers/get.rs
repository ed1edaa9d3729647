//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    carts::{errors::into_status_error, responses::CartPayload},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the caller's cart, re-priced against the discounts current at the
/// requested point in time.
#[endpoint(tags("carrito"), summary = "Get Cart")]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CartPayload>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.cart_owner_or_500()?;
    let point_in_time = at.into_point_in_time()?;

    let priced = state
        .app
        .carts
        .price_cart(owner, point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(priced.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;
    use uuid::Uuid;

    use bazar_app::domain::carts::{CartsServiceError, MockCartsService, models::CartOwner};

    use crate::test_helpers::{TEST_SESSION_UUID, carts_service, priced_cart_with_line};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("carrito").get(handler))
    }

    #[tokio::test]
    async fn get_returns_priced_cart_payload() -> TestResult {
        let cart_uuid = Uuid::now_v7();
        let priced = priced_cart_with_line(cart_uuid, 10_000, 2);

        let mut carts = MockCartsService::new();

        carts
            .expect_price_cart()
            .once()
            .withf(|owner, _| *owner == CartOwner::Session(TEST_SESSION_UUID))
            .return_once(move |_, _| Ok(priced));

        let mut res = TestClient::get("http://example.com/carrito")
            .send(&make_service(carts))
            .await;

        let body: CartPayload = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.carrito.id, cart_uuid);
        assert_eq!(body.resumen.sub_total, 20_000);
        assert_eq!(body.resumen.cantidad_items, 1);

        Ok(())
    }

    #[tokio::test]
    async fn pricing_failure_returns_500() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_price_cart().once().return_once(|_, _| {
            Err(CartsServiceError::Pricing(
                bazar::discounts::PricingError::AmountOverflow,
            ))
        });

        let res = TestClient::get("http://example.com/carrito")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
