//! Create Order Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        requests::{CreateOrderRequest, PedidoResponse},
    },
    state::State,
};

/// Create Order Handler
///
/// Places an order from the caller's cart. The cart is re-priced one final
/// time inside the placement transaction; stock is decremented under row
/// locks and the cart is emptied on success.
#[endpoint(
    tags("pedidos"),
    summary = "Place Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or bad payload"),
        (status_code = StatusCode::CONFLICT, description = "Insufficient stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PedidoResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.cart_owner_or_500()?;

    let placed = state
        .app
        .orders
        .place_order(owner, json.into_inner().into(), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/pedidos/{}", placed.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(placed.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bazar_app::domain::orders::{MockOrdersService, OrdersServiceError};

    use crate::test_helpers::{make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("pedidos").post(handler))
    }

    fn order_body() -> serde_json::Value {
        json!({
            "cliente": {
                "nombre": "Ana Benítez",
                "email": "ana@example.com",
                "direccion": "Av. Mariscal López 1234",
                "ciudad": "Asunción"
            },
            "metodoPago": "transferencia"
        })
    }

    #[tokio::test]
    async fn place_order_returns_201() -> TestResult {
        let order = make_order(20_000, 2_000);
        let order_uuid = order.uuid;

        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(|_, new, _| new.customer.email == "ana@example.com")
            .return_once(move |_, _, _| Ok(order));

        let mut res = TestClient::post("http://example.com/pedidos")
            .json(&order_body())
            .send(&make_service(orders))
            .await;

        let body: PedidoResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.id, order_uuid.into_uuid());
        assert_eq!(body.estado, "pendiente");
        assert_eq!(body.importe_descuento, 2_000);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::EmptyCart));

        let res = TestClient::post("http://example.com/pedidos")
            .json(&order_body())
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn insufficient_stock_returns_409() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::InsufficientStock));

        let res = TestClient::post("http://example.com/pedidos")
            .json(&order_body())
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
