//! List Products Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    extensions::*,
    products::{errors::into_status_error, responses::ProductoResponse},
    state::State,
};

/// List Products Handler
#[endpoint(
    tags("productos"),
    summary = "List Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<ProductoResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let products = state
        .app
        .products
        .list_products(point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(
        products.into_iter().map(ProductoResponse::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bazar_app::domain::products::MockProductsService;

    use crate::test_helpers::{make_product, products_service};

    use super::*;

    #[tokio::test]
    async fn index_returns_products() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .return_once(|_| Ok(vec![make_product("Yerba mate", "yerba-mate")]));

        let mut res = TestClient::get("http://example.com/productos")
            .send(&products_service(
                products,
                Router::with_path("productos").get(handler),
            ))
            .await;

        let body: Vec<ProductoResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.len(), 1);
        assert_eq!(
            body.first().map(|p| p.nombre.as_str()),
            Some("Yerba mate")
        );

        Ok(())
    }
}
