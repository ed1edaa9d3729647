//! Cart lines
//!
//! The line model the pricing pipeline works over. A [`RawLine`] is what the
//! storage layer hands in: stored quantities joined against the live variant
//! row. Prices are never frozen at add time, so every pricing run starts from
//! the variant's current price.

use decimal_percentage::Percentage;
use uuid::Uuid;

/// Which discount stage, if any, claimed a line.
///
/// The variants are mutually exclusive: a line discounted per-product is
/// never touched by the amount-tier stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscountKind {
    /// No discount applied.
    #[default]
    None,

    /// A per-variant product discount applied.
    Product,

    /// The amount-tier discount applied.
    Amount,
}

/// An unpriced cart line.
#[derive(Debug, Clone)]
pub struct RawLine {
    /// Stored cart-item row identity.
    pub item_uuid: Uuid,

    /// Variant the line refers to.
    pub variant_uuid: Uuid,

    /// Parent product of the variant.
    pub product_uuid: Uuid,

    /// Display name, resolved from the variant.
    pub name: String,

    /// URL slug, resolved from the variant.
    pub slug: String,

    /// Image URL, resolved from the variant.
    pub image_url: String,

    /// Current unit price in guaraníes.
    pub unit_price: u64,

    /// Stored quantity; always positive.
    pub quantity: u32,

    /// Variant flag: when set, the amount-tier stage skips this line.
    pub discount_blocked: bool,

    /// Current variant stock, passed through for display.
    pub stock: i64,
}

/// A fully priced cart line.
#[derive(Debug, Clone)]
pub struct PricedLine {
    /// The underlying raw line.
    pub raw: RawLine,

    /// `unit_price × quantity`.
    pub subtotal: u64,

    /// Percentage applied by whichever stage claimed the line.
    pub discount_percent: Option<Percentage>,

    /// Which stage claimed the line.
    pub discount_kind: DiscountKind,

    /// Amount taken off the subtotal; never exceeds it.
    pub discount_amount: u64,

    /// `subtotal - discount_amount`.
    pub total: u64,

    /// Human-readable description of the applied discount.
    pub description: Option<String>,
}

impl PricedLine {
    /// Whether the amount-tier stage may still claim this line.
    #[must_use]
    pub fn tier_eligible(&self) -> bool {
        self.discount_kind != DiscountKind::Product && !self.raw.discount_blocked
    }
}
