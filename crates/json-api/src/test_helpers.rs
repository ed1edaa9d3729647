//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use bazar::{
    discounts::product_discount_map,
    lines::RawLine,
    pricing::price_lines,
    summary::summarize,
};
use bazar_app::{
    auth::{MockAuthService, models::UserUuid},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{CartItem, CartItemUuid, CartOwner, CartUuid, PricedCart},
        },
        discounts::{
            MockDiscountsService,
            models::{Discount, DiscountKind, DiscountUuid},
        },
        orders::{
            MockOrdersService,
            models::{Customer, Order, OrderItem, OrderItemUuid, OrderStatus, OrderUuid},
        },
        products::{
            MockProductsService,
            models::{Product, ProductUuid, Variant, VariantUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_SESSION_UUID: Uuid = Uuid::nil();
pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// Wire the five service slots; fresh mocks panic on any unexpected call.
struct Mocks {
    products: MockProductsService,
    discounts: MockDiscountsService,
    carts: MockCartsService,
    orders: MockOrdersService,
    auth: MockAuthService,
}

impl Default for Mocks {
    fn default() -> Self {
        Self {
            products: MockProductsService::new(),
            discounts: MockDiscountsService::new(),
            carts: MockCartsService::new(),
            orders: MockOrdersService::new(),
            auth: MockAuthService::new(),
        }
    }
}

fn make_state(mocks: Mocks) -> Arc<State> {
    Arc::new(State::new(AppContext {
        products: Arc::new(mocks.products),
        discounts: Arc::new(mocks.discounts),
        carts: Arc::new(mocks.carts),
        orders: Arc::new(mocks.orders),
        auth: Arc::new(mocks.auth),
    }))
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    make_state(Mocks {
        auth,
        ..Mocks::default()
    })
}

#[salvo::handler]
pub(crate) async fn inject_session_owner(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_cart_owner(CartOwner::Session(TEST_SESSION_UUID));
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    let state = make_state(Mocks {
        carts,
        ..Mocks::default()
    });

    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_session_owner)
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    let state = make_state(Mocks {
        products,
        ..Mocks::default()
    });

    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_admin_user)
            .push(route),
    )
}

pub(crate) fn discounts_service(discounts: MockDiscountsService, route: Router) -> Service {
    let state = make_state(Mocks {
        discounts,
        ..Mocks::default()
    });

    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_admin_user)
            .push(route),
    )
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    let state = make_state(Mocks {
        orders,
        ..Mocks::default()
    });

    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_session_owner)
            .hoop(inject_admin_user)
            .push(route),
    )
}

/// A priced cart with one undiscounted line, run through the real pipeline.
pub(crate) fn priced_cart_with_line(cart_uuid: Uuid, unit_price: u64, quantity: u32) -> PricedCart {
    let raw = RawLine {
        item_uuid: Uuid::now_v7(),
        variant_uuid: Uuid::now_v7(),
        product_uuid: Uuid::now_v7(),
        name: "Yerba mate 500g".to_string(),
        slug: "yerba-mate-500g".to_string(),
        image_url: String::new(),
        unit_price,
        quantity,
        discount_blocked: false,
        stock: 25,
    };

    let lines = price_lines(vec![raw], &product_discount_map(Vec::new()))
        .unwrap_or_default();

    let summary = summarize(&lines).unwrap_or_default();

    PricedCart {
        cart_uuid: CartUuid::from_uuid(cart_uuid),
        lines,
        summary,
    }
}

pub(crate) fn cart_item(uuid: CartItemUuid, quantity: u32) -> CartItem {
    CartItem {
        uuid,
        cart_uuid: CartUuid::new(),
        product_uuid: ProductUuid::new(),
        variant_uuid: VariantUuid::new(),
        quantity,
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
        deleted_at: None,
    }
}

pub(crate) fn make_product(name: &str, slug: &str) -> Product {
    Product {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        slug: slug.to_string(),
        active: true,
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
        deleted_at: None,
    }
}

pub(crate) fn make_variant(product: ProductUuid, name: &str, price: u64) -> Variant {
    Variant {
        uuid: VariantUuid::new(),
        product_uuid: product,
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        image_url: String::new(),
        price,
        stock: 25,
        discount_blocked: false,
        active: true,
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
        deleted_at: None,
    }
}

pub(crate) fn make_amount_discount(from: u64, to: u64, percent: u32) -> Discount {
    Discount {
        uuid: DiscountUuid::new(),
        kind: DiscountKind::Amount,
        variant_uuid: None,
        percent: Decimal::from(percent),
        amount_from: Some(from),
        amount_to: Some(to),
        valid_from: jiff::civil::date(2026, 1, 1),
        valid_to: jiff::civil::date(2026, 12, 31),
        active: true,
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
        deleted_at: None,
    }
}

pub(crate) fn make_order(subtotal: u64, discount_amount: u64) -> Order {
    let order_uuid = OrderUuid::new();

    Order {
        uuid: order_uuid,
        number: "ORD-00001234".to_string(),
        user_uuid: None,
        status: OrderStatus::Pending,
        subtotal,
        discount_amount,
        shipping_cost: 0,
        total: subtotal - discount_amount,
        payment_method: "transferencia".to_string(),
        customer: Customer {
            name: "Ana Benítez".to_string(),
            email: "ana@example.com".to_string(),
            phone: String::new(),
            address: "Av. Mariscal López 1234".to_string(),
            city: "Asunción".to_string(),
            notes: String::new(),
        },
        items: vec![OrderItem {
            uuid: OrderItemUuid::new(),
            order_uuid,
            product_uuid: ProductUuid::new(),
            variant_uuid: VariantUuid::new(),
            name: "Yerba mate 500g".to_string(),
            quantity: 2,
            unit_price: subtotal / 2,
            discount_percent: None,
            discount_amount,
            subtotal,
            total: subtotal - discount_amount,
            created_at: Timestamp::now(),
        }],
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
        deleted_at: None,
    }
}
