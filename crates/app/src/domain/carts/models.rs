//! Cart Models

use jiff::Timestamp;
use uuid::Uuid;

use bazar::{lines::PricedLine, summary::CartSummary};

use crate::{
    auth::models::UserUuid,
    domain::products::models::{ProductUuid, VariantUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Who a cart belongs to: an authenticated user, or an anonymous session
/// identified by the token the server mints and echoes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOwner {
    User(UserUuid),
    Session(Uuid),
}

/// Cart Model
#[derive(Debug, Clone)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: Option<UserUuid>,
    pub session_uuid: Option<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// CartItem Model
#[derive(Debug, Clone)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New Cart Item Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub uuid: CartItemUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
}

/// A cart freshly run through the pricing pipeline.
#[derive(Debug, Clone)]
pub struct PricedCart {
    pub cart_uuid: CartUuid,
    pub lines: Vec<PricedLine>,
    pub summary: CartSummary,
}
