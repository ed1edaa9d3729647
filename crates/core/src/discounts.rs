//! Discounts
//!
//! Discount records as the pricing pipeline sees them: already filtered to
//! active, date-current rows by the caller. Also the shared percent-of-amount
//! arithmetic used by both discount stages.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rustc_hash::FxHashMap;
use thiserror::Error;
use uuid::Uuid;

/// Errors specific to pricing calculations.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A quantity × unit price or summary addition exceeded the money range.
    #[error("amount arithmetic overflowed")]
    AmountOverflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// A per-variant percentage discount.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDiscount {
    /// Variant the discount targets.
    pub variant_uuid: Uuid,

    /// Fraction of the line subtotal taken off.
    pub percent: Percentage,
}

/// An amount-tier discount: a percentage that applies when the eligible cart
/// subtotal falls within `[lower, upper]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountTier {
    /// Inclusive lower bound on the eligible subtotal.
    pub lower: u64,

    /// Inclusive upper bound on the eligible subtotal.
    pub upper: u64,

    /// Fraction taken off each eligible line.
    pub percent: Percentage,
}

impl AmountTier {
    /// Whether an eligible subtotal falls within this tier's bounds.
    #[must_use]
    pub const fn contains(&self, amount: u64) -> bool {
        self.lower <= amount && amount <= self.upper
    }
}

/// Build the variant → discount map the line pricing stage consumes.
///
/// Overlapping records for the same variant are a data-entry accident the
/// store does not prevent, so precedence is explicit: the highest percentage
/// wins, matching the amount-tier tie-break.
pub fn product_discount_map(
    discounts: impl IntoIterator<Item = ProductDiscount>,
) -> FxHashMap<Uuid, ProductDiscount> {
    let mut map: FxHashMap<Uuid, ProductDiscount> = FxHashMap::default();

    for discount in discounts {
        match map.get(&discount.variant_uuid) {
            Some(existing) if as_decimal(existing.percent) >= as_decimal(discount.percent) => {}
            _ => {
                map.insert(discount.variant_uuid, discount);
            }
        }
    }

    map
}

/// Calculate `percent` of `amount`, rounded half-away-from-zero to whole
/// units and clamped to `amount`.
///
/// The clamp keeps a line's discount from exceeding its subtotal even under a
/// misconfigured percentage above 100%.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] when the multiplication
/// overflows or the result cannot be represented.
pub fn percent_of(amount: u64, percent: Percentage) -> Result<u64, PricingError> {
    let amount_decimal = Decimal::from_u64(amount).ok_or(PricingError::PercentConversion)?;

    let applied = as_decimal(percent)
        .checked_mul(amount_decimal)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(PricingError::PercentConversion)?;

    Ok(applied.min(amount))
}

/// Whether a percentage is strictly positive.
#[must_use]
pub fn is_positive(percent: Percentage) -> bool {
    as_decimal(percent) > Decimal::ZERO
}

// decimal_percentage doesn't expose the underlying Decimal.
pub(crate) fn as_decimal(percent: Percentage) -> Decimal {
    percent * Decimal::ONE
}
