//! Recalculate Cart Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, responses::CartPayload},
    extensions::*,
    state::State,
};

/// Recalculate Cart Handler
///
/// Alias of the cart read: pricing is recomputed on every read, so forcing a
/// recalculation is just another read.
#[endpoint(tags("carrito"), summary = "Recalculate Cart")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartPayload>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.cart_owner_or_500()?;

    let priced = state
        .app
        .carts
        .price_cart(owner, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(priced.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;
    use uuid::Uuid;

    use bazar_app::domain::carts::MockCartsService;

    use crate::test_helpers::{carts_service, priced_cart_with_line};

    use super::*;

    #[tokio::test]
    async fn recalculate_returns_priced_cart() -> TestResult {
        let cart_uuid = Uuid::now_v7();
        let priced = priced_cart_with_line(cart_uuid, 5_000, 3);

        let mut carts = MockCartsService::new();

        carts
            .expect_price_cart()
            .once()
            .return_once(move |_, _| Ok(priced));

        let mut res = TestClient::post("http://example.com/carrito/recalcular")
            .send(&carts_service(
                carts,
                Router::with_path("carrito/recalcular").post(handler),
            ))
            .await;

        let body: CartPayload = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.resumen.sub_total, 15_000);

        Ok(())
    }
}
