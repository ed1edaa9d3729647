//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Item Removed Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ItemRemovedResponse {
    /// Outcome message
    pub mensaje: String,
}

/// Remove Cart Item Handler
#[endpoint(
    tags("carrito"),
    summary = "Remove Item from Cart",
    responses(
        (status_code = StatusCode::OK, description = "Item removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ItemRemovedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.cart_owner_or_500()?;

    state
        .app
        .carts
        .remove_item(owner, item.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(ItemRemovedResponse {
        mensaje: "Item eliminado del carrito".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use bazar_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::carts_service;

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(
            carts,
            Router::with_path("carrito/item/{item}").delete(handler),
        )
    }

    #[tokio::test]
    async fn remove_item_returns_200() -> TestResult {
        let item = Uuid::now_v7();

        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .withf(move |_, uuid| uuid.into_uuid() == item)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/carrito/item/{item}"))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_item_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::NotFound));

        let res = TestClient::delete(format!(
            "http://example.com/carrito/item/{}",
            Uuid::now_v7()
        ))
        .send(&make_service(carts))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
