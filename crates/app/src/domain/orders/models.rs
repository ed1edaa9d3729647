//! Order Models

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    auth::models::UserUuid,
    domain::products::models::{ProductUuid, VariantUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether moving to `next` is a legal transition.
    ///
    /// The forward chain is pending → confirmed → shipped → delivered;
    /// cancellation is possible until the order ships.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Shipped | Self::Cancelled)
                | (Self::Shipped, Self::Delivered)
        )
    }
}

/// Customer and delivery details captured inline with the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub notes: String,
}

/// Order Model
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub number: String,
    pub user_uuid: Option<UserUuid>,
    pub status: OrderStatus,
    pub subtotal: u64,
    pub discount_amount: u64,
    pub shipping_cost: u64,
    pub total: u64,
    pub payment_method: String,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// OrderItem Model
///
/// A snapshot of a priced cart line at placement time. Unlike cart lines,
/// these amounts are frozen.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: VariantUuid,
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub discount_percent: Option<Decimal>,
    pub discount_amount: u64,
    pub subtotal: u64,
    pub total: u64,
    pub created_at: Timestamp,
}

/// New Order Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub customer: Customer,
    pub payment_method: String,
    pub shipping_cost: u64,
}
