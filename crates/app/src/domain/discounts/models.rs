//! Discount Models

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;

use crate::{domain::products::models::VariantUuid, uuids::TypedUuid};

/// Discount UUID
pub type DiscountUuid = TypedUuid<Discount>;

/// Which population a discount row targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "discount_kind", rename_all = "lowercase")]
pub enum DiscountKind {
    /// A percentage off one variant's lines.
    Product,

    /// A percentage off every eligible line when the eligible subtotal falls
    /// within `[amount_from, amount_to]`.
    Amount,
}

/// Discount Model
#[derive(Debug, Clone)]
pub struct Discount {
    pub uuid: DiscountUuid,
    pub kind: DiscountKind,
    pub variant_uuid: Option<VariantUuid>,
    pub percent: Decimal,
    pub amount_from: Option<u64>,
    pub amount_to: Option<u64>,
    pub valid_from: Date,
    pub valid_to: Date,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Date range and switch shared by every discount shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validity {
    pub from: Date,
    pub to: Date,
    pub active: bool,
}

/// New Discount Model
#[derive(Debug, Clone, PartialEq)]
pub enum NewDiscount {
    /// Per-variant percentage discount.
    Product {
        uuid: DiscountUuid,
        variant_uuid: VariantUuid,
        percent: Decimal,
        validity: Validity,
    },

    /// Amount-tier percentage discount.
    Amount {
        uuid: DiscountUuid,
        amount_from: u64,
        amount_to: u64,
        percent: Decimal,
        validity: Validity,
    },
}

impl NewDiscount {
    #[must_use]
    pub const fn uuid(&self) -> DiscountUuid {
        match self {
            Self::Product { uuid, .. } | Self::Amount { uuid, .. } => *uuid,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> DiscountKind {
        match self {
            Self::Product { .. } => DiscountKind::Product,
            Self::Amount { .. } => DiscountKind::Amount,
        }
    }
}

/// Discount Update Model
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountUpdate {
    pub percent: Decimal,
    pub amount_from: Option<u64>,
    pub amount_to: Option<u64>,
    pub validity: Validity,
}
