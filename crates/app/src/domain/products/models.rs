//! Product Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,
}

/// Product Update Model
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub slug: String,
    pub active: bool,
}

/// Variant UUID
pub type VariantUuid = TypedUuid<Variant>;

/// Variant Model
///
/// Carries the live price the cart reads on every pricing run, plus the two
/// flags the pricing pipeline cares about: `active` (invisible to carts when
/// unset) and `discount_blocked` (never receives the amount-tier discount).
#[derive(Debug, Clone)]
pub struct Variant {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub image_url: String,
    pub price: u64,
    pub stock: i64,
    pub discount_blocked: bool,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New Variant Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewVariant {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub image_url: String,
    pub price: u64,
    pub stock: i64,
    pub discount_blocked: bool,
}

/// Variant Update Model
#[derive(Debug, Clone, PartialEq)]
pub struct VariantUpdate {
    pub name: String,
    pub slug: String,
    pub image_url: String,
    pub price: u64,
    pub stock: i64,
    pub discount_blocked: bool,
    pub active: bool,
}
