//! App Router

use salvo::Router;

use crate::{auth, carts, discounts, orders, products, session, variants};

/// The full application router.
///
/// Storefront routes sit behind the session middleware (user or anonymous
/// session identity); admin routes require a bearer token.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(
            Router::new()
                .hoop(session::handler)
                .push(
                    Router::with_path("carrito")
                        .get(carts::get::handler)
                        .push(Router::with_path("agregar").post(carts::add::handler))
                        .push(
                            Router::with_path("item/{item}")
                                .put(carts::update_item::handler)
                                .delete(carts::remove_item::handler),
                        )
                        .push(Router::with_path("vaciar").post(carts::clear::handler))
                        .push(
                            Router::with_path("recalcular").post(carts::recalculate::handler),
                        ),
                )
                .push(Router::with_path("pedidos").post(orders::create::handler)),
        )
        .push(
            Router::new()
                .hoop(auth::handler)
                .push(
                    Router::with_path("productos")
                        .get(products::index::handler)
                        .post(products::create::handler)
                        .push(
                            Router::with_path("{product}")
                                .get(products::get::handler)
                                .put(products::update::handler)
                                .delete(products::delete::handler)
                                .push(
                                    Router::with_path("variantes")
                                        .post(variants::create::handler),
                                ),
                        ),
                )
                .push(
                    Router::with_path("variantes/{variant}")
                        .put(variants::update::handler)
                        .delete(variants::delete::handler),
                )
                .push(
                    Router::with_path("descuentos")
                        .get(discounts::index::handler)
                        .post(discounts::create::handler)
                        .push(
                            Router::with_path("{discount}")
                                .put(discounts::update::handler)
                                .delete(discounts::delete::handler),
                        ),
                )
                .push(
                    Router::with_path("pedidos/{order}")
                        .get(orders::get::handler)
                        .push(
                            Router::with_path("estado").put(orders::update_status::handler),
                        ),
                ),
        )
}
